//! Line-format I/O and file-to-file drivers.
//!
//! The readers and writers in the submodules cover the three listing formats
//! exchanged with other tools: raw edges, edge groups and node maps. The
//! drivers below wire them to the partitioners and the cut evaluator.

pub mod edge_group;
pub mod edge_list;
pub mod node_map;

pub use edge_group::{EdgeGroup, EdgeGroupReader, read_edge_groups};
pub use edge_list::{EdgeListReader, GraphCounts, count_nodes_and_edges, read_placements};
pub use node_map::{load_node_map, read_node_map, save_node_map, write_node_map};

use crate::partitioning::batch::{BatchOutcome, BatchPartitioner};
use crate::partitioning::metrics::{self, CutReport};
use crate::partitioning::streaming::{StreamOutcome, partition_stream};
use crate::partitioning::{Edge, HostId, PartitionError, PartitionerConfig};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// `<base>_<host>`, the per-host edge-partition file name.
pub fn part_path(base: &Path, host: HostId) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!("_{host}"));
    PathBuf::from(name)
}

fn create(path: &Path) -> Result<BufWriter<File>, PartitionError> {
    Ok(BufWriter::new(File::create(path)?))
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    /// Edge records in the group listing.
    pub edges: u64,
    /// Cuts of the new assignment over the group listing.
    pub cuts: CutReport,
}

/// Partition an edge-group listing with the batch partitioner.
///
/// Each input line is copied verbatim to `<edge_part>_<host>` for the host of
/// its node, and the node map is written to `node_part` in node order.
pub fn run_batch(
    cfg: &PartitionerConfig,
    edge_groups: &Path,
    node_part: &Path,
    edge_part: &Path,
) -> Result<BatchReport, PartitionError> {
    let groups = read_edge_groups(BufReader::new(File::open(edge_groups)?))?;
    let edges: Vec<Edge> = groups.iter().flat_map(|g| g.edges.iter().copied()).collect();
    log::info!("num nodes: {}, num edges: {}", groups.len(), edges.len());
    if let Some(max_id) = groups.iter().map(|g| g.node).max() {
        if edge_list::is_sparse(max_id.saturating_add(1), groups.len() as u64) {
            log::warn!(
                "largest node id {} is far above {} group lines; node map is sized by id",
                max_id,
                groups.len()
            );
        }
    }

    let mut partitioner = BatchPartitioner::new(cfg, groups.len())?;
    let mut outputs = (0..cfg.num_hosts)
        .map(|h| create(&part_path(edge_part, h)))
        .collect::<Result<Vec<_>, _>>()?;
    for group in &groups {
        let host = partitioner.place(&group.neighbor_group())?;
        writeln!(outputs[host], "{}", group.line)?;
    }
    for out in &mut outputs {
        out.flush()?;
    }

    let outcome = partitioner.finish();
    save_node_map(node_part, &outcome.assignment)?;

    let cuts = metrics::par_count_cuts(&outcome.assignment, &edges)?;
    log::info!(
        "cut {} of {} edges, ratio {:.6}, imbalance {:.4}",
        cuts.cut_edges,
        cuts.evaluated_edges,
        cuts.ratio(),
        metrics::imbalance(&outcome.host_sizes.iter().map(|&n| n as u64).collect::<Vec<_>>())
    );
    Ok(BatchReport {
        outcome,
        edges: edges.len() as u64,
        cuts,
    })
}

#[derive(Debug, Clone)]
pub struct StreamReport {
    pub outcome: StreamOutcome,
    /// Totals from the counting pass.
    pub counts: GraphCounts,
}

/// Partition a raw edge listing with the streaming partitioner.
///
/// A first pass sizes the node id space, a second pass places edges and
/// writes `src dst host` to `edge_part` as each edge is decided.
pub fn run_stream(
    cfg: &PartitionerConfig,
    edge_list: &Path,
    edge_part: &Path,
    node_part: &Path,
) -> Result<StreamReport, PartitionError> {
    let counts = count_nodes_and_edges(BufReader::new(File::open(edge_list)?))?;
    log::info!("num nodes: {}, num edges: {}", counts.nodes, counts.edges);
    cfg.capacity(counts.nodes)?;

    let mut out = create(edge_part)?;
    let outcome = partition_stream(cfg, counts.nodes, EdgeListReader::open(edge_list)?, |p| {
        Ok(edge_list::write_placement(&mut out, p)?)
    })?;
    out.flush()?;
    save_node_map(node_part, &outcome.assignment)?;

    let loads: Vec<u64> = outcome.hosts.iter().map(|h| h.nodes).collect();
    log::info!(
        "final ceiling {:.3} after {} growths, node imbalance {:.4}",
        outcome.final_ceiling,
        outcome.growths,
        metrics::imbalance(&loads)
    );
    Ok(StreamReport { outcome, counts })
}

/// Layout of a listing handed to [`evaluate_cuts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingFormat {
    #[default]
    Groups,
    Edges,
}

impl fmt::Display for ListingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ListingFormat::Groups => "groups",
            ListingFormat::Edges => "edges",
        })
    }
}

impl FromStr for ListingFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groups" => Ok(ListingFormat::Groups),
            "edges" => Ok(ListingFormat::Edges),
            other => Err(format!("unknown listing format `{other}` (expected groups or edges)")),
        }
    }
}

/// Count cut edges of the node map in `node_part` over `listing`.
pub fn evaluate_cuts(
    num_nodes: usize,
    node_part: &Path,
    listing: &Path,
    format: ListingFormat,
) -> Result<CutReport, PartitionError> {
    let assignment = load_node_map(node_part, num_nodes)?;
    let report = match format {
        ListingFormat::Groups => {
            itertools::process_results(EdgeGroupReader::open(listing)?, |groups| {
                let edges = groups.flat_map(|g| g.edges).map(|e| (e.src, e.dst));
                metrics::count_cuts(&assignment, edges)
            })??
        }
        ListingFormat::Edges => {
            itertools::process_results(EdgeListReader::open(listing)?, |edges| {
                metrics::count_cuts(&assignment, edges.map(|e| (e.src, e.dst)))
            })??
        }
    };
    log::info!(
        "{} cuts over {} evaluated edges ({} skipped)",
        report.cut_edges,
        report.evaluated_edges,
        report.skipped_edges
    );
    Ok(report)
}

/// Borrowed-endpoint count of a streaming edge partition over `num_hosts` hosts.
pub fn count_borrowed(
    num_nodes: usize,
    num_hosts: usize,
    node_part: &Path,
    edge_part: &Path,
) -> Result<u64, PartitionError> {
    let assignment = load_node_map(node_part, num_nodes)?;
    assignment.check_hosts(num_hosts)?;
    let placements = read_placements(BufReader::new(File::open(edge_part)?))?;
    metrics::borrowed_nodes(&assignment, num_hosts, placements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_path_appends_host() {
        assert_eq!(part_path(Path::new("out/edges"), 3), PathBuf::from("out/edges_3"));
    }

    #[test]
    fn listing_format_names() {
        assert_eq!("edges".parse::<ListingFormat>().unwrap(), ListingFormat::Edges);
        assert_eq!(ListingFormat::default().to_string(), "groups");
        assert!("csv".parse::<ListingFormat>().is_err());
    }
}
