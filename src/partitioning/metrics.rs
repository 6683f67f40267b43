//! Partition quality metrics.
//!
//! This module measures a finished (or partial) assignment: edge cut and cut
//! ratio, borrowed endpoints of an edge partition, and load imbalance.
//!
//! An edge with an unassigned endpoint is outside the evaluated domain. It is
//! neither a cut nor a kept edge and is reported separately as skipped, so
//! partial runs do not inflate the cut ratio. An endpoint id past the end of
//! the assignment is an error, not an unassigned node.

use super::{Edge, HostAssignment, HostId, NodeId, PartitionError};
use rayon::prelude::*;

/// Cut statistics for a listing of directed edge records.
///
/// A symmetric listing that stores each undirected edge once per direction
/// counts a cut twice, matching the listing's own edge total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutReport {
    /// Evaluated edges whose endpoints sit on different hosts.
    pub cut_edges: u64,
    /// Edges with both endpoints assigned.
    pub evaluated_edges: u64,
    /// Edges with at least one unassigned endpoint.
    pub skipped_edges: u64,
}

impl CutReport {
    pub fn total_edges(&self) -> u64 {
        self.evaluated_edges + self.skipped_edges
    }

    /// `cut_edges / evaluated_edges`, or 0.0 when nothing was evaluated.
    pub fn ratio(&self) -> f64 {
        if self.evaluated_edges == 0 {
            return 0.0;
        }
        self.cut_edges as f64 / self.evaluated_edges as f64
    }

    fn record(
        mut self,
        assignment: &HostAssignment,
        src: NodeId,
        dst: NodeId,
    ) -> Result<Self, PartitionError> {
        match (host_of(assignment, src)?, host_of(assignment, dst)?) {
            (Some(a), Some(b)) => {
                self.evaluated_edges += 1;
                self.cut_edges += (a != b) as u64;
            }
            _ => self.skipped_edges += 1,
        }
        Ok(self)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            cut_edges: self.cut_edges + other.cut_edges,
            evaluated_edges: self.evaluated_edges + other.evaluated_edges,
            skipped_edges: self.skipped_edges + other.skipped_edges,
        }
    }
}

/// Host of `node`, or an error when the id is past the end of `assignment`.
fn host_of(assignment: &HostAssignment, node: NodeId) -> Result<Option<HostId>, PartitionError> {
    if node >= assignment.len() {
        return Err(PartitionError::NodeOutOfRange {
            node,
            total: assignment.len(),
        });
    }
    Ok(assignment.get(node))
}

/// Whether `(src, dst)` crosses hosts; `None` if either endpoint is unassigned.
pub fn is_cut(assignment: &HostAssignment, src: NodeId, dst: NodeId) -> Option<bool> {
    Some(assignment.get(src)? != assignment.get(dst)?)
}

/// Counts cut edges over any stream of `(src, dst)` records (O(E)).
///
/// # Errors
/// `NodeOutOfRange` for an endpoint at or past `assignment.len()`.
pub fn count_cuts<I>(assignment: &HostAssignment, edges: I) -> Result<CutReport, PartitionError>
where
    I: IntoIterator<Item = (NodeId, NodeId)>,
{
    edges
        .into_iter()
        .try_fold(CutReport::default(), |acc, (src, dst)| {
            acc.record(assignment, src, dst)
        })
}

/// Parallel [`count_cuts`] over an in-memory edge slice.
///
/// Counts are sums, so the result is identical to the sequential version.
pub fn par_count_cuts(
    assignment: &HostAssignment,
    edges: &[Edge],
) -> Result<CutReport, PartitionError> {
    edges
        .par_iter()
        .try_fold(CutReport::default, |acc, e| acc.record(assignment, e.src, e.dst))
        .try_reduce(CutReport::default, |a, b| Ok(a.merge(b)))
}

/// Counts endpoints whose own host differs from their edge's host of record.
///
/// Each `(src, dst, host)` record contributes 0, 1 or 2. Unassigned endpoints
/// are not counted.
///
/// # Errors
/// `HostOutOfRange` for a host of record not below `num_hosts`,
/// `NodeOutOfRange` for an endpoint past the end of `assignment`.
pub fn borrowed_nodes<I>(
    assignment: &HostAssignment,
    num_hosts: usize,
    placements: I,
) -> Result<u64, PartitionError>
where
    I: IntoIterator<Item = (NodeId, NodeId, HostId)>,
{
    placements
        .into_iter()
        .try_fold(0u64, |total, (src, dst, host)| {
            if host >= num_hosts {
                return Err(PartitionError::HostOutOfRange { host, num_hosts });
            }
            let mut borrowed = 0;
            for node in [src, dst] {
                if matches!(host_of(assignment, node)?, Some(h) if h != host) {
                    borrowed += 1;
                }
            }
            Ok(total + borrowed)
        })
}

/// Maximum relative deviation of a host's load above the mean load.
///
/// Returns 0.0 for no hosts or zero total load.
pub fn imbalance(loads: &[u64]) -> f64 {
    if loads.is_empty() {
        return 0.0;
    }
    let total: u64 = loads.iter().sum();
    let ideal = total as f64 / loads.len() as f64;
    if ideal == 0.0 {
        return 0.0;
    }
    loads
        .iter()
        .map(|&load| (load as f64 - ideal) / ideal)
        .fold(0.0f64, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(hosts: &[Option<HostId>]) -> HostAssignment {
        let mut a = HostAssignment::new(hosts.len());
        for (v, h) in hosts.iter().enumerate() {
            if let Some(h) = h {
                a.assign(v, *h).unwrap();
            }
        }
        a
    }

    #[test]
    fn edge_cut_cycle() {
        // 4-cycle: 0-1-2-3-0
        let edges = [(0, 1), (1, 2), (2, 3), (3, 0)];
        let same = assignment(&[Some(0); 4]);
        assert_eq!(count_cuts(&same, edges).unwrap().cut_edges, 0);

        let split = assignment(&[Some(0), Some(0), Some(1), Some(1)]);
        let report = count_cuts(&split, edges).unwrap();
        assert_eq!(report.cut_edges, 2);
        assert_eq!(report.evaluated_edges, 4);
        assert!((report.ratio() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unassigned_endpoints_are_skipped() {
        let a = assignment(&[Some(0), Some(1), None]);
        let report = count_cuts(&a, [(0, 1), (1, 2), (2, 0)]).unwrap();
        assert_eq!(report.cut_edges, 1);
        assert_eq!(report.evaluated_edges, 1);
        assert_eq!(report.skipped_edges, 2);
        assert_eq!(report.total_edges(), 3);
        assert_eq!(report.ratio(), 1.0);
    }

    #[test]
    fn endpoint_past_the_map_is_an_error() {
        let a = assignment(&[Some(0), Some(1), None]);
        assert!(matches!(
            count_cuts(&a, [(0, 1), (0, 7)]),
            Err(PartitionError::NodeOutOfRange { node: 7, total: 3 })
        ));
        assert!(matches!(
            count_cuts(&a, [(12345, 1)]),
            Err(PartitionError::NodeOutOfRange { node: 12345, total: 3 })
        ));
        let edges = [Edge::new(0, 1), Edge::new(99, 0)];
        assert!(matches!(
            par_count_cuts(&a, &edges),
            Err(PartitionError::NodeOutOfRange { node: 99, total: 3 })
        ));
    }

    #[test]
    fn symmetric_listing_counts_both_directions() {
        let a = assignment(&[Some(0), Some(1)]);
        let report = count_cuts(&a, [(0, 1), (1, 0)]).unwrap();
        assert_eq!(report.cut_edges, 2);
        assert_eq!(is_cut(&a, 0, 1), is_cut(&a, 1, 0));
    }

    #[test]
    fn parallel_matches_sequential() {
        let hosts: Vec<Option<HostId>> = (0..50)
            .map(|v| if v % 7 == 0 { None } else { Some(v % 3) })
            .collect();
        let a = assignment(&hosts);
        let edges: Vec<Edge> = (0..50)
            .flat_map(|v| [Edge::new(v, (v + 1) % 50), Edge::new(v, (v * 3) % 50)])
            .collect();
        let seq = count_cuts(&a, edges.iter().map(|e| (e.src, e.dst))).unwrap();
        assert_eq!(par_count_cuts(&a, &edges).unwrap(), seq);
    }

    #[test]
    fn empty_report_has_zero_ratio() {
        assert_eq!(CutReport::default().ratio(), 0.0);
    }

    #[test]
    fn borrowed_endpoints() {
        let a = assignment(&[Some(0), Some(0), Some(1), None]);
        let placements = [(0, 1, 0), (1, 2, 0), (0, 2, 1), (2, 3, 0)];
        // 0 + 1 (node 2) + 1 (node 0) + 1 (node 2; node 3 unassigned)
        assert_eq!(borrowed_nodes(&a, 2, placements).unwrap(), 3);
    }

    #[test]
    fn borrowed_rejects_out_of_range_records() {
        let a = assignment(&[Some(0), Some(1)]);
        assert!(matches!(
            borrowed_nodes(&a, 2, [(0, 1, 0), (0, 1, 5)]),
            Err(PartitionError::HostOutOfRange { host: 5, num_hosts: 2 })
        ));
        assert!(matches!(
            borrowed_nodes(&a, 2, [(0, 77, 1)]),
            Err(PartitionError::NodeOutOfRange { node: 77, total: 2 })
        ));
    }

    #[test]
    fn imbalance_of_loads() {
        assert!((imbalance(&[6, 4]) - 0.2).abs() < 1e-12);
        assert_eq!(imbalance(&[5, 5]), 0.0);
        assert_eq!(imbalance(&[]), 0.0);
        assert_eq!(imbalance(&[0, 0]), 0.0);
    }
}
