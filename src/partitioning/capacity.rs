//! Capacity tracking for the streaming partitioner.
//!
//! [`CapacityTracker`] owns the per-host [`HostState`] counters and a single
//! node ceiling shared by all hosts. A host can take another node while its
//! node count is below the ceiling. When every host has reached the ceiling,
//! the ceiling is raised for all of them at once by a fixed delta. It is never
//! lowered.
//!
//! Only node counts are capacity limited. Edge counts are tracked for
//! tie-breaking and reporting.

use super::{HostId, HostState, PartitionError, PartitionerConfig};
use crate::debug_invariants::DebugInvariants;

#[derive(Debug, Clone)]
pub struct CapacityTracker {
    hosts: Vec<HostState>,
    initial_ceiling: f64,
    ceiling: f64,
    delta: f64,
    growths: usize,
}

impl CapacityTracker {
    /// Tracker sized from `cfg` for a graph of `total_nodes` nodes.
    ///
    /// The initial ceiling is [`PartitionerConfig::capacity`] and the growth
    /// step is [`PartitionerConfig::growth_delta`].
    pub fn new(cfg: &PartitionerConfig, total_nodes: usize) -> Result<Self, PartitionError> {
        let ceiling = cfg.capacity(total_nodes)?;
        let delta = cfg.growth_delta(total_nodes)?;
        Self::with_ceiling(cfg.num_hosts, ceiling, delta)
    }

    /// Tracker with an explicit initial ceiling and growth step.
    pub fn with_ceiling(num_hosts: usize, ceiling: f64, delta: f64) -> Result<Self, PartitionError> {
        if num_hosts == 0 {
            return Err(PartitionError::ZeroHosts);
        }
        if !ceiling.is_finite() || ceiling < 0.0 {
            return Err(PartitionError::InvalidParameter {
                name: "ceiling",
                value: ceiling,
            });
        }
        if !delta.is_finite() || delta <= 0.0 {
            return Err(PartitionError::InvalidParameter {
                name: "delta",
                value: delta,
            });
        }
        Ok(Self {
            hosts: vec![HostState::default(); num_hosts],
            initial_ceiling: ceiling,
            ceiling,
            delta,
            growths: 0,
        })
    }

    pub fn num_hosts(&self) -> usize {
        self.hosts.len()
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// How many times the ceiling has been raised.
    pub fn growths(&self) -> usize {
        self.growths
    }

    pub fn host(&self, host: HostId) -> &HostState {
        &self.hosts[host]
    }

    pub fn hosts(&self) -> &[HostState] {
        &self.hosts
    }

    /// True iff `host` holds fewer nodes than the current ceiling.
    pub fn can_accept(&self, host: HostId) -> bool {
        (self.hosts[host].nodes as f64) < self.ceiling
    }

    pub fn record_nodes(&mut self, host: HostId, count: u64) {
        self.hosts[host].nodes += count;
    }

    pub fn record_node(&mut self, host: HostId) {
        self.record_nodes(host, 1);
    }

    pub fn record_edge(&mut self, host: HostId) {
        self.hosts[host].edges += 1;
    }

    fn all_saturated(&self) -> bool {
        (0..self.hosts.len()).all(|h| !self.can_accept(h))
    }

    /// Raise the ceiling if every host has reached it.
    ///
    /// Raises repeatedly by `delta` until some host can accept again, so the
    /// next decision always has a candidate. Returns whether any raise happened.
    pub fn maybe_grow(&mut self) -> bool {
        let mut grew = false;
        while self.all_saturated() {
            self.ceiling += self.delta;
            self.growths += 1;
            grew = true;
            log::debug!(
                "all {} hosts saturated, ceiling raised to {:.3}",
                self.hosts.len(),
                self.ceiling
            );
        }
        grew
    }

    /// Host with the fewest nodes among those under the ceiling, ties broken by
    /// fewest edges, then by lowest index. `None` when every host is saturated.
    pub fn least_loaded(&self) -> Option<HostId> {
        let mut best: Option<HostId> = None;
        for host in 0..self.hosts.len() {
            if !self.can_accept(host) {
                continue;
            }
            best = match best {
                None => Some(host),
                Some(b) => {
                    let (cur, cand) = (&self.hosts[b], &self.hosts[host]);
                    if (cand.nodes, cand.edges) < (cur.nodes, cur.edges) {
                        Some(host)
                    } else {
                        Some(b)
                    }
                }
            };
        }
        best
    }

    /// [`least_loaded`](Self::least_loaded), growing the ceiling first if needed.
    pub fn least_loaded_or_grow(&mut self) -> HostId {
        loop {
            if let Some(host) = self.least_loaded() {
                return host;
            }
            self.maybe_grow();
        }
    }

    pub fn total_nodes(&self) -> u64 {
        self.hosts.iter().map(|h| h.nodes).sum()
    }

    pub fn total_edges(&self) -> u64 {
        self.hosts.iter().map(|h| h.edges).sum()
    }
}

impl DebugInvariants for CapacityTracker {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "CapacityTracker invalid");
    }

    fn validate_invariants(&self) -> Result<(), PartitionError> {
        if self.ceiling < self.initial_ceiling {
            return Err(PartitionError::Invariant(format!(
                "ceiling {} dropped below its initial value {}",
                self.ceiling, self.initial_ceiling
            )));
        }
        let expected = self.initial_ceiling + self.delta * self.growths as f64;
        if (self.ceiling - expected).abs() > 1e-6 * expected.max(1.0) {
            return Err(PartitionError::Invariant(format!(
                "ceiling {} does not match {} growths of {}",
                self.ceiling, self.growths, self.delta
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_nodes_two_hosts() {
        let t = CapacityTracker::new(&PartitionerConfig::with_hosts(2), 10).unwrap();
        assert!((t.ceiling() - 5.5).abs() < 1e-12);
        assert!((t.delta() - 0.5).abs() < 1e-12);
        assert!(t.can_accept(0) && t.can_accept(1));
    }

    #[test]
    fn ten_nodes_two_hosts_growth() {
        let mut t = CapacityTracker::new(&PartitionerConfig::with_hosts(2), 10).unwrap();
        t.record_nodes(0, 6);
        assert!(!t.maybe_grow());
        t.record_nodes(1, 6);
        assert!(!t.can_accept(0) && !t.can_accept(1));
        assert!(t.maybe_grow());
        // 5.5 + 0.5 = 6.0 still saturates both, one more step frees them
        assert!((t.ceiling() - 6.5).abs() < 1e-12);
        assert_eq!(t.growths(), 2);
        assert!(t.can_accept(0) && t.can_accept(1));
    }

    #[test]
    fn grows_only_when_every_host_is_full() {
        let mut t = CapacityTracker::with_ceiling(2, 2.0, 1.0).unwrap();
        t.record_nodes(0, 2);
        assert!(!t.can_accept(0));
        assert!(!t.maybe_grow());
        assert_eq!(t.ceiling(), 2.0);

        t.record_nodes(1, 2);
        assert!(t.maybe_grow());
        assert_eq!(t.ceiling(), 3.0);
        assert!(t.can_accept(0) && t.can_accept(1));
        assert_eq!(t.growths(), 1);
    }

    #[test]
    fn growth_repeats_until_headroom() {
        let mut t = CapacityTracker::with_ceiling(2, 5.5, 0.5).unwrap();
        t.record_nodes(0, 7);
        t.record_nodes(1, 6);
        assert!(t.maybe_grow());
        // 5.5 -> 6.0 still saturates host 1 (6 nodes), 6.5 frees it.
        assert_eq!(t.ceiling(), 6.5);
        assert_eq!(t.least_loaded(), Some(1));
        t.validate_invariants().unwrap();
    }

    #[test]
    fn least_loaded_tie_breaks() {
        let mut t = CapacityTracker::with_ceiling(3, 10.0, 1.0).unwrap();
        assert_eq!(t.least_loaded(), Some(0));
        t.record_nodes(0, 1);
        t.record_nodes(1, 1);
        t.record_nodes(2, 1);
        t.record_edge(0);
        // equal nodes; host 0 has more edges, hosts 1 and 2 tie -> lowest index
        assert_eq!(t.least_loaded(), Some(1));
    }

    #[test]
    fn least_loaded_skips_full_hosts() {
        let mut t = CapacityTracker::with_ceiling(2, 1.0, 1.0).unwrap();
        t.record_node(0);
        assert_eq!(t.least_loaded(), Some(1));
        t.record_node(1);
        assert_eq!(t.least_loaded(), None);
        assert_eq!(t.least_loaded_or_grow(), 0);
        assert_eq!(t.ceiling(), 2.0);
    }

    #[test]
    fn rejects_zero_hosts_and_zero_delta() {
        assert!(matches!(
            CapacityTracker::with_ceiling(0, 1.0, 1.0),
            Err(PartitionError::ZeroHosts)
        ));
        assert!(matches!(
            CapacityTracker::with_ceiling(2, 1.0, 0.0),
            Err(PartitionError::InvalidParameter { name: "delta", .. })
        ));
        assert!(matches!(
            CapacityTracker::new(&PartitionerConfig::default(), 0),
            Err(PartitionError::EmptyGraph)
        ));
    }
}
