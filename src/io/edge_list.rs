//! Raw edge listings: one `src dst [weight]` record per line.
//!
//! The same module reads and writes the streaming edge-partition format,
//! `src dst host`, one record per placed edge.

use crate::partitioning::streaming::EdgePlacement;
use crate::partitioning::{Edge, HostId, NodeId, PartitionError};
use itertools::Itertools;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;

pub(crate) fn parse_node(line: usize, raw: &str) -> Result<NodeId, PartitionError> {
    raw.parse()
        .map_err(|_| PartitionError::malformed(line, format!("invalid node id: {raw}")))
}

fn parse_weight(line: usize, raw: &str) -> Result<f64, PartitionError> {
    raw.parse()
        .map_err(|_| PartitionError::malformed(line, format!("invalid weight: {raw}")))
}

/// Parse one edge record. Blank lines yield `None`.
pub fn parse_edge(line: usize, text: &str) -> Result<Option<Edge>, PartitionError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    match fields.as_slice() {
        [] => Ok(None),
        [src, dst] => Ok(Some(Edge::new(parse_node(line, src)?, parse_node(line, dst)?))),
        [src, dst, w] => Ok(Some(Edge::weighted(
            parse_node(line, src)?,
            parse_node(line, dst)?,
            parse_weight(line, w)?,
        ))),
        _ => Err(PartitionError::malformed(
            line,
            format!("expected 2 or 3 fields, found {}", fields.len()),
        )),
    }
}

/// Iterator over the edges of a listing, with 1-based line numbers in errors.
pub struct EdgeListReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> EdgeListReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R> EdgeListReader<R> {
    /// Line number of the last record returned.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl EdgeListReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, PartitionError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for EdgeListReader<R> {
    type Item = Result<Edge, PartitionError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match parse_edge(self.line, &text) {
                Ok(Some(edge)) => return Some(Ok(edge)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Node and edge totals of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphCounts {
    /// Largest node id seen plus one.
    pub nodes: usize,
    pub edges: u64,
}

/// Node id spaces larger than this multiple of the record count are reported.
const SPARSE_ID_FACTOR: u64 = 16;

/// Whether a dense map over `nodes` ids is far larger than `records` justify.
pub(crate) fn is_sparse(nodes: usize, records: u64) -> bool {
    nodes as u64 > records.saturating_mul(SPARSE_ID_FACTOR).max(1024)
}

/// Counting pass over a raw listing.
///
/// # Errors
/// `Malformed` for a node id with no room for `id + 1`.
pub fn count_nodes_and_edges<R: BufRead>(reader: R) -> Result<GraphCounts, PartitionError> {
    let mut edges = EdgeListReader::new(reader);
    let mut counts = GraphCounts::default();
    while let Some(edge) = edges.next() {
        let edge = edge?;
        let nodes = edge
            .src
            .max(edge.dst)
            .checked_add(1)
            .ok_or_else(|| PartitionError::malformed(edges.line(), "node id too large"))?;
        counts.nodes = counts.nodes.max(nodes);
        counts.edges += 1;
    }
    if is_sparse(counts.nodes, counts.edges) {
        log::warn!(
            "largest node id {} is far above {} edges; node map is sized by id",
            counts.nodes - 1,
            counts.edges
        );
    }
    Ok(counts)
}

pub fn write_placement<W: Write>(out: &mut W, placement: &EdgePlacement) -> std::io::Result<()> {
    writeln!(out, "{} {} {}", placement.src, placement.dst, placement.host)
}

/// Parse one `src dst host` record. Blank lines yield `None`.
pub fn parse_placement(
    line: usize,
    text: &str,
) -> Result<Option<(NodeId, NodeId, HostId)>, PartitionError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let (src, dst, host) = text
        .split_whitespace()
        .collect_tuple()
        .ok_or_else(|| PartitionError::malformed(line, "expected `src dst host`"))?;
    let host = host
        .parse()
        .map_err(|_| PartitionError::malformed(line, format!("invalid host: {host}")))?;
    Ok(Some((parse_node(line, src)?, parse_node(line, dst)?, host)))
}

/// Read every record of an edge-partition file.
pub fn read_placements<R: BufRead>(
    reader: R,
) -> Result<Vec<(NodeId, NodeId, HostId)>, PartitionError> {
    let mut out = Vec::new();
    for (idx, text) in reader.lines().enumerate() {
        if let Some(p) = parse_placement(idx + 1, &text?)? {
            out.push(p);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioning::streaming::PlacementRule;
    use std::io::Cursor;

    #[test]
    fn reads_weighted_and_plain_edges() {
        let input = "0 1\n\n1 2 0.5\n";
        let edges: Vec<Edge> = EdgeListReader::new(Cursor::new(input))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(edges, vec![Edge::new(0, 1), Edge::weighted(1, 2, 0.5)]);
    }

    #[test]
    fn reports_line_of_bad_record() {
        let input = "0 1\n1 x\n";
        let err = EdgeListReader::new(Cursor::new(input))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert!(matches!(err, PartitionError::Malformed { line: 2, .. }));

        let err = parse_edge(7, "1 2 3 4").unwrap_err();
        assert!(matches!(err, PartitionError::Malformed { line: 7, .. }));
        assert!(parse_edge(1, "-1 2").is_err());
        assert!(parse_edge(1, "1 2 heavy").is_err());
    }

    #[test]
    fn counting_pass() {
        let counts = count_nodes_and_edges(Cursor::new("0 4\n2 1\n4 4\n")).unwrap();
        assert_eq!(counts, GraphCounts { nodes: 5, edges: 3 });
        assert_eq!(
            count_nodes_and_edges(Cursor::new("")).unwrap(),
            GraphCounts::default()
        );
    }

    #[test]
    fn counting_pass_rejects_largest_id() {
        let input = format!("0 1\n\n{} 0\n", usize::MAX);
        let err = count_nodes_and_edges(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, PartitionError::Malformed { line: 3, .. }));

        let input = format!("{} 2\n", usize::MAX - 1);
        let counts = count_nodes_and_edges(Cursor::new(input)).unwrap();
        assert_eq!(counts.nodes, usize::MAX);
    }

    #[test]
    fn sparse_id_space() {
        assert!(!is_sparse(1024, 0));
        assert!(!is_sparse(1600, 100));
        assert!(is_sparse(1601, 100));
        assert!(is_sparse(1_000_000_000_001, 3));
    }

    #[test]
    fn placement_lines() {
        let mut buf = Vec::new();
        let p = EdgePlacement {
            src: 3,
            dst: 9,
            host: 1,
            rule: PlacementRule::FreshPair,
        };
        write_placement(&mut buf, &p).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "3 9 1\n");
        assert_eq!(read_placements(Cursor::new(buf)).unwrap(), vec![(3, 9, 1)]);
        assert!(parse_placement(1, "3 9").is_err());
        assert!(parse_placement(1, "3 9 -1").is_err());
    }
}
