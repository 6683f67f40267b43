//! Batch greedy partitioning over fully materialised neighbour groups.
//!
//! Every node is placed exactly once, in input order, on the host that
//! maximises the configured [`Strategy`] against that host's current node set.
//! The capacity constant is fixed for the whole run (see
//! [`PartitionerConfig::capacity`]).
//!
//! # Tie-breaking
//! Each placement draws a uniformly random seed host and starts the ascending
//! scan with it as the current best. Other hosts replace it only on a strict
//! improvement, so when no host has a locality signal the seed host wins
//! rather than host 0.
//!
//! Commits happen one node at a time. Scores for a node depend on all earlier
//! commits, so the scan is not parallelised.

use super::scoring::ScoreInput;
use super::{HostAssignment, HostId, NodeId, PartitionError, PartitionerConfig, Strategy};
use hashbrown::HashSet;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A node together with its distinct neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborGroup {
    pub node: NodeId,
    pub neighbors: HashSet<NodeId>,
}

impl NeighborGroup {
    pub fn new(node: NodeId, neighbors: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            node,
            neighbors: neighbors.into_iter().collect(),
        }
    }
}

/// Result of a finished batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub assignment: HostAssignment,
    /// Nodes placed on each host.
    pub host_sizes: Vec<usize>,
    /// Capacity constant the scores were measured against.
    pub capacity: f64,
}

#[derive(Debug)]
pub struct BatchPartitioner<R = SmallRng> {
    strategy: Strategy,
    capacity: f64,
    host_nodes: Vec<HashSet<NodeId>>,
    assignment: HostAssignment,
    rng: R,
}

impl BatchPartitioner<SmallRng> {
    /// Partitioner for a graph of `total_nodes` nodes, seeded from `cfg.rng_seed`.
    pub fn new(cfg: &PartitionerConfig, total_nodes: usize) -> Result<Self, PartitionError> {
        Self::with_rng(cfg, total_nodes, SmallRng::seed_from_u64(cfg.rng_seed))
    }
}

impl<R: Rng> BatchPartitioner<R> {
    /// Partitioner drawing tie seeds and random scores from `rng`.
    pub fn with_rng(
        cfg: &PartitionerConfig,
        total_nodes: usize,
        rng: R,
    ) -> Result<Self, PartitionError> {
        let capacity = cfg.capacity(total_nodes)?;
        log::info!(
            "batch partitioning {} nodes onto {} hosts, strategy {}, capacity {:.3}",
            total_nodes,
            cfg.num_hosts,
            cfg.strategy,
            capacity
        );
        Ok(Self {
            strategy: cfg.strategy,
            capacity,
            host_nodes: vec![HashSet::new(); cfg.num_hosts],
            assignment: HostAssignment::new(total_nodes),
            rng,
        })
    }

    pub fn num_hosts(&self) -> usize {
        self.host_nodes.len()
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn host_nodes(&self, host: HostId) -> &HashSet<NodeId> {
        &self.host_nodes[host]
    }

    pub fn assignment(&self) -> &HostAssignment {
        &self.assignment
    }

    /// Host with the highest score for `group`, without committing it.
    pub fn choose_host(&mut self, group: &NeighborGroup) -> HostId {
        let Self {
            strategy,
            capacity,
            host_nodes,
            rng,
            ..
        } = self;
        let num_hosts = host_nodes.len();
        let seed = rng.gen_range(0..num_hosts);
        let score = |host: HostId, rng: &mut R| {
            let input = ScoreInput {
                host_nodes: &host_nodes[host],
                neighbors: &group.neighbors,
                capacity: *capacity,
            };
            strategy.score(&input, rng)
        };

        let mut best = seed;
        let mut best_score = score(seed, rng);
        for host in (0..num_hosts).filter(|&h| h != seed) {
            let s = score(host, rng);
            if s > best_score {
                best = host;
                best_score = s;
            }
        }
        best
    }

    /// Choose a host for `group` and commit the node to it.
    ///
    /// A node seen before keeps its first host; the repeat is logged and that
    /// host is returned.
    pub fn place(&mut self, group: &NeighborGroup) -> Result<HostId, PartitionError> {
        if let Some(host) = self.assignment.get(group.node) {
            log::warn!(
                "node {} listed more than once, keeping host {}",
                group.node,
                host
            );
            return Ok(host);
        }
        let host = self.choose_host(group);
        self.assignment.assign_growing(group.node, host)?;
        self.host_nodes[host].insert(group.node);
        log::trace!("node {} -> host {}", group.node, host);
        Ok(host)
    }

    pub fn finish(self) -> BatchOutcome {
        let host_sizes: Vec<usize> = self.host_nodes.iter().map(HashSet::len).collect();
        log::info!("batch partitioning done, host sizes {:?}", host_sizes);
        BatchOutcome {
            assignment: self.assignment,
            host_sizes,
            capacity: self.capacity,
        }
    }
}

/// Place every group in order with a partitioner seeded from `cfg`.
///
/// The node count used for capacity is the number of groups.
pub fn partition_groups(
    cfg: &PartitionerConfig,
    groups: &[NeighborGroup],
) -> Result<BatchOutcome, PartitionError> {
    let mut partitioner = BatchPartitioner::new(cfg, groups.len())?;
    for group in groups {
        partitioner.place(group)?;
    }
    Ok(partitioner.finish())
}
