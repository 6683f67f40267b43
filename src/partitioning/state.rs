//! Per-host counters and the node-to-host assignment.
//!
//! Both structures only grow: counters are never decremented and a node that
//! has a host keeps it for the rest of the run.

use super::{HostId, NodeId, PartitionError};

/// Node and edge counters for one host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostState {
    pub nodes: u64,
    pub edges: u64,
}

/// Dense node → host map. `None` marks a node that has not been placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAssignment {
    hosts: Vec<Option<HostId>>,
    assigned: usize,
}

impl HostAssignment {
    /// Create an assignment for `total_nodes` nodes, all unassigned.
    pub fn new(total_nodes: usize) -> Self {
        Self {
            hosts: vec![None; total_nodes],
            assigned: 0,
        }
    }

    /// Number of node slots (assigned or not).
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Number of nodes that have a host.
    pub fn assigned_count(&self) -> usize {
        self.assigned
    }

    /// Host of `node`, or `None` when unassigned or out of range.
    pub fn get(&self, node: NodeId) -> Option<HostId> {
        self.hosts.get(node).copied().flatten()
    }

    pub fn is_assigned(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Place `node` on `host`.
    ///
    /// Repeating an existing placement is a no-op; moving a placed node is an error.
    ///
    /// # Errors
    /// `NodeOutOfRange` if `node >= len()`, `Reassignment` if it already sits elsewhere.
    pub fn assign(&mut self, node: NodeId, host: HostId) -> Result<(), PartitionError> {
        let total = self.hosts.len();
        let slot = self
            .hosts
            .get_mut(node)
            .ok_or(PartitionError::NodeOutOfRange { node, total })?;
        match *slot {
            Some(current) if current == host => Ok(()),
            Some(current) => Err(PartitionError::Reassignment {
                node,
                current,
                requested: host,
            }),
            None => {
                *slot = Some(host);
                self.assigned += 1;
                Ok(())
            }
        }
    }

    /// Like [`assign`](Self::assign), but grows the map when `node` is past the end.
    ///
    /// Used where the node count is not known up front.
    pub fn assign_growing(&mut self, node: NodeId, host: HostId) -> Result<(), PartitionError> {
        if node >= self.hosts.len() {
            self.hosts.resize(node + 1, None);
        }
        self.assign(node, host)
    }

    /// Iterate `(node, host)` over assigned nodes in ascending node order.
    pub fn iter_assigned(&self) -> impl Iterator<Item = (NodeId, HostId)> + '_ {
        self.hosts
            .iter()
            .enumerate()
            .filter_map(|(node, host)| host.map(|h| (node, h)))
    }

    /// Number of assigned nodes per host, for `num_hosts` hosts.
    pub fn host_sizes(&self, num_hosts: usize) -> Vec<usize> {
        let mut sizes = vec![0; num_hosts];
        for (_, host) in self.iter_assigned() {
            if host < num_hosts {
                sizes[host] += 1;
            }
        }
        sizes
    }

    /// Fails on the first assigned host that is not below `num_hosts`.
    pub fn check_hosts(&self, num_hosts: usize) -> Result<(), PartitionError> {
        match self.iter_assigned().find(|&(_, h)| h >= num_hosts) {
            Some((_, host)) => Err(PartitionError::HostOutOfRange { host, num_hosts }),
            None => Ok(()),
        }
    }

    pub fn as_slice(&self) -> &[Option<HostId>] {
        &self.hosts
    }
}
