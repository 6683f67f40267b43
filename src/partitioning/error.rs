//! Partitioning errors for hostpart

use thiserror::Error;

/// Errors from configuration, partitioning and line-format I/O.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// The partition count was zero.
    #[error("number of hosts must be at least 1")]
    ZeroHosts,
    /// The graph contains no nodes, so no capacity can be derived.
    #[error("graph has no nodes; capacity is undefined")]
    EmptyGraph,
    /// A tuning parameter is outside its valid range.
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    /// A scoring strategy name was not recognised.
    #[error("unknown strategy `{0}` (expected affinity, balance or random)")]
    UnknownStrategy(String),
    /// A node id is not below the declared node count.
    #[error("node {node} out of range (graph has {total} nodes)")]
    NodeOutOfRange { node: usize, total: usize },
    /// A host id is not below the number of hosts.
    #[error("host {host} out of range ({num_hosts} hosts)")]
    HostOutOfRange { host: usize, num_hosts: usize },
    /// A node that already has a host was assigned a different one.
    #[error("node {node} is already on host {current}, cannot move it to host {requested}")]
    Reassignment {
        node: usize,
        current: usize,
        requested: usize,
    },
    /// A record in a line-oriented input could not be parsed.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    /// Internal bookkeeping disagrees with itself.
    #[error("invariant violated: {0}")]
    Invariant(String),
    /// Underlying read or write failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PartitionError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        PartitionError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}
