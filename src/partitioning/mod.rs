//! Entry-point for greedy host partitioning.
//!
//! Two partitioners share the same configuration and scoring vocabulary:
//! - [`batch::BatchPartitioner`] places whole neighbour groups, one node at a time.
//! - [`streaming::StreamingPartitioner`] places nodes as raw edges arrive.
//!
//! Both commit decisions once and never revisit them. [`metrics`] measures the
//! result.

pub mod batch;
pub mod capacity;
pub mod error;
pub mod metrics;
pub mod scoring;
pub mod state;
pub mod streaming;

pub use self::capacity::CapacityTracker;
pub use self::error::PartitionError;
pub use self::metrics::{CutReport, borrowed_nodes, count_cuts, imbalance, par_count_cuts};
pub use self::scoring::Strategy;
pub use self::state::{HostAssignment, HostState};

/// Identifier of a graph node, dense in `[0, total_nodes)`.
pub type NodeId = usize;

/// Identifier of a host (partition), dense in `[0, num_hosts)`.
pub type HostId = usize;

/// A directed edge as read from a listing. Locality scoring treats it as undirected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub src: NodeId,
    pub dst: NodeId,
    pub weight: f64,
}

impl Edge {
    pub fn new(src: NodeId, dst: NodeId) -> Self {
        Self {
            src,
            dst,
            weight: 1.0,
        }
    }

    pub fn weighted(src: NodeId, dst: NodeId, weight: f64) -> Self {
        Self { src, dst, weight }
    }

    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}

#[derive(Debug, Clone)]
pub struct PartitionerConfig {
    /// Number of hosts to partition onto.
    pub num_hosts: usize,
    /// Slack over an even split used for the capacity constant and the
    /// initial streaming ceiling.
    pub balance_slack: f64,
    /// Fraction of an even split added to the ceiling each time all hosts saturate.
    pub growth_fraction: f64,
    /// Scoring used by the batch partitioner.
    pub strategy: Strategy,
    /// Seed for the batch tie seed and the random strategy.
    pub rng_seed: u64,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            num_hosts: 2,
            balance_slack: 0.1,
            growth_fraction: 0.1,
            strategy: Strategy::Affinity,
            rng_seed: 42,
        }
    }
}

impl PartitionerConfig {
    pub fn with_hosts(num_hosts: usize) -> Self {
        Self {
            num_hosts,
            ..Default::default()
        }
    }

    /// Rejects configurations that would make capacity arithmetic meaningless.
    pub fn validate(&self) -> Result<(), PartitionError> {
        if self.num_hosts == 0 {
            return Err(PartitionError::ZeroHosts);
        }
        if !self.balance_slack.is_finite() || self.balance_slack < 0.0 {
            return Err(PartitionError::InvalidParameter {
                name: "balance_slack",
                value: self.balance_slack,
            });
        }
        if !self.growth_fraction.is_finite() || self.growth_fraction <= 0.0 {
            return Err(PartitionError::InvalidParameter {
                name: "growth_fraction",
                value: self.growth_fraction,
            });
        }
        Ok(())
    }

    fn even_share(&self, total_nodes: usize) -> Result<f64, PartitionError> {
        self.validate()?;
        if total_nodes == 0 {
            return Err(PartitionError::EmptyGraph);
        }
        Ok(total_nodes as f64 / self.num_hosts as f64)
    }

    /// Per-host node capacity: an even split plus `balance_slack`.
    pub fn capacity(&self, total_nodes: usize) -> Result<f64, PartitionError> {
        Ok(self.even_share(total_nodes)? * (1.0 + self.balance_slack))
    }

    /// Amount the streaming ceiling grows by once every host is saturated.
    pub fn growth_delta(&self, total_nodes: usize) -> Result<f64, PartitionError> {
        Ok(self.even_share(total_nodes)? * self.growth_fraction)
    }
}


#[cfg(test)]
mod tests;
