//! Online edge-at-a-time partitioning.
//!
//! Each edge is placed as it arrives, by the first rule that applies:
//!
//! 1. Neither endpoint placed: both go to the least-loaded host still under
//!    the ceiling (fewest nodes, then fewest edges, then lowest index).
//! 2. One endpoint placed: the other joins it if that host is under the
//!    ceiling, otherwise it goes to the least-loaded host.
//! 3. Both placed: nothing moves. The edge is recorded on the shared host, or
//!    for a cut edge on whichever endpoint host has fewer edges (lower index
//!    on a tie).
//!
//! After every edge the [`CapacityTracker`] may raise the ceiling. Decisions
//! are never revisited, so the pass is O(E) time and O(V + P) memory. Edges
//! must be fed in a single total order; the result depends on it.
//!
//! Nodes that never appear in an edge stay unassigned.

use super::{
    CapacityTracker, Edge, HostAssignment, HostId, HostState, NodeId, PartitionError,
    PartitionerConfig,
};
use crate::debug_invariants::DebugInvariants;

/// Which rule placed an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementRule {
    /// Rule 1: both endpoints were new.
    FreshPair,
    /// Rule 2: the new endpoint joined its neighbour's host.
    JoinKnown,
    /// Rule 2: the neighbour's host was full, the new endpoint went elsewhere.
    Overflow,
    /// Rule 3: both endpoints already share a host.
    Local,
    /// Rule 3: endpoints sit on different hosts.
    CrossHost,
}

/// The host of record chosen for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePlacement {
    pub src: NodeId,
    pub dst: NodeId,
    pub host: HostId,
    pub rule: PlacementRule,
}

/// Result of a finished streaming run.
#[derive(Debug, Clone)]
pub struct StreamOutcome {
    pub assignment: HostAssignment,
    pub hosts: Vec<HostState>,
    pub final_ceiling: f64,
    pub growths: usize,
    pub edges: u64,
}

#[derive(Debug, Clone)]
pub struct StreamingPartitioner {
    assignment: HostAssignment,
    tracker: CapacityTracker,
    edges: u64,
}

impl StreamingPartitioner {
    /// Partitioner for node ids in `[0, total_nodes)` with a tracker sized from `cfg`.
    pub fn new(cfg: &PartitionerConfig, total_nodes: usize) -> Result<Self, PartitionError> {
        let tracker = CapacityTracker::new(cfg, total_nodes)?;
        log::info!(
            "streaming {} nodes onto {} hosts, initial ceiling {:.3}, growth {:.3}",
            total_nodes,
            cfg.num_hosts,
            tracker.ceiling(),
            tracker.delta()
        );
        Ok(Self::with_tracker(total_nodes, tracker))
    }

    pub fn with_tracker(total_nodes: usize, tracker: CapacityTracker) -> Self {
        Self {
            assignment: HostAssignment::new(total_nodes),
            tracker,
            edges: 0,
        }
    }

    pub fn assignment(&self) -> &HostAssignment {
        &self.assignment
    }

    pub fn tracker(&self) -> &CapacityTracker {
        &self.tracker
    }

    /// Edges placed so far.
    pub fn edges(&self) -> u64 {
        self.edges
    }

    fn check_node(&self, node: NodeId) -> Result<(), PartitionError> {
        let total = self.assignment.len();
        if node >= total {
            return Err(PartitionError::NodeOutOfRange { node, total });
        }
        Ok(())
    }

    /// Decide the host of record for edge `(src, dst)` and commit any new nodes.
    pub fn place(&mut self, src: NodeId, dst: NodeId) -> Result<EdgePlacement, PartitionError> {
        self.check_node(src)?;
        self.check_node(dst)?;

        let (host, rule) = match (self.assignment.get(src), self.assignment.get(dst)) {
            (None, None) => {
                let host = self.tracker.least_loaded_or_grow();
                self.assignment.assign(src, host)?;
                if src == dst {
                    log::warn!("self loop on node {}", src);
                    self.tracker.record_node(host);
                } else {
                    self.assignment.assign(dst, host)?;
                    self.tracker.record_nodes(host, 2);
                }
                (host, PlacementRule::FreshPair)
            }
            (Some(known), None) | (None, Some(known)) => {
                let target = if self.assignment.is_assigned(src) { dst } else { src };
                let (host, rule) = if self.tracker.can_accept(known) {
                    (known, PlacementRule::JoinKnown)
                } else {
                    (self.tracker.least_loaded_or_grow(), PlacementRule::Overflow)
                };
                self.assignment.assign(target, host)?;
                self.tracker.record_node(host);
                (host, rule)
            }
            (Some(a), Some(b)) if a == b => (a, PlacementRule::Local),
            (Some(a), Some(b)) => {
                let (ea, eb) = (self.tracker.host(a).edges, self.tracker.host(b).edges);
                let host = match ea.cmp(&eb) {
                    std::cmp::Ordering::Less => a,
                    std::cmp::Ordering::Greater => b,
                    std::cmp::Ordering::Equal => a.min(b),
                };
                (host, PlacementRule::CrossHost)
            }
        };
        self.tracker.record_edge(host);
        self.edges += 1;
        self.tracker.maybe_grow();

        log::trace!("edge ({}, {}) -> host {} via {:?}", src, dst, host, rule);
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.tracker.debug_assert_invariants();

        Ok(EdgePlacement {
            src,
            dst,
            host,
            rule,
        })
    }

    pub fn place_edge(&mut self, edge: &Edge) -> Result<EdgePlacement, PartitionError> {
        self.place(edge.src, edge.dst)
    }

    pub fn finish(self) -> StreamOutcome {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
        for (host, state) in self.tracker.hosts().iter().enumerate() {
            log::info!("host {}: {} nodes, {} edges", host, state.nodes, state.edges);
        }
        StreamOutcome {
            hosts: self.tracker.hosts().to_vec(),
            final_ceiling: self.tracker.ceiling(),
            growths: self.tracker.growths(),
            edges: self.edges,
            assignment: self.assignment,
        }
    }
}

impl DebugInvariants for StreamingPartitioner {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "StreamingPartitioner invalid");
    }

    fn validate_invariants(&self) -> Result<(), PartitionError> {
        self.tracker.validate_invariants()?;
        self.assignment.check_hosts(self.tracker.num_hosts())?;
        let counted = self.tracker.total_nodes();
        let assigned = self.assignment.assigned_count() as u64;
        if counted != assigned {
            return Err(PartitionError::Invariant(format!(
                "hosts count {} nodes but {} are assigned",
                counted, assigned
            )));
        }
        if self.tracker.total_edges() != self.edges {
            return Err(PartitionError::Invariant(format!(
                "hosts count {} edges but {} were placed",
                self.tracker.total_edges(),
                self.edges
            )));
        }
        Ok(())
    }
}

/// Stream `edges` through a partitioner for `total_nodes` nodes, handing every
/// placement to `emit` as soon as it is decided.
pub fn partition_stream<I, F>(
    cfg: &PartitionerConfig,
    total_nodes: usize,
    edges: I,
    mut emit: F,
) -> Result<StreamOutcome, PartitionError>
where
    I: IntoIterator<Item = Result<Edge, PartitionError>>,
    F: FnMut(&EdgePlacement) -> Result<(), PartitionError>,
{
    let mut partitioner = StreamingPartitioner::new(cfg, total_nodes)?;
    for edge in edges {
        let placement = partitioner.place_edge(&edge?)?;
        emit(&placement)?;
    }
    Ok(partitioner.finish())
}
