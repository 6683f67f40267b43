//! Edge-group listings: `node numEdges ...` per line.
//!
//! The trailing fields are either `numEdges` neighbour ids, or `numEdges`
//! `dst weight` pairs. Any other field count is malformed.

use super::edge_list::parse_node;
use crate::partitioning::batch::NeighborGroup;
use crate::partitioning::{Edge, NodeId, PartitionError};
use itertools::Itertools;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// One parsed group line.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGroup {
    pub node: NodeId,
    /// Out-edges of `node`, in listing order.
    pub edges: Vec<Edge>,
    pub weighted: bool,
    /// The line as read, without its terminator.
    pub line: String,
}

impl EdgeGroup {
    pub fn parse(line: usize, text: &str) -> Result<Option<Self>, PartitionError> {
        let mut fields = text.split_whitespace();
        let Some(node) = fields.next() else {
            return Ok(None);
        };
        let node = parse_node(line, node)?;
        let count_raw = fields
            .next()
            .ok_or_else(|| PartitionError::malformed(line, "missing edge count"))?;
        let count: usize = count_raw.parse().map_err(|_| {
            PartitionError::malformed(line, format!("invalid edge count: {count_raw}"))
        })?;
        let rest: Vec<&str> = fields.collect();

        let (edges, weighted) = if rest.len() == count {
            let edges = rest
                .iter()
                .map(|dst| Ok(Edge::new(node, parse_node(line, dst)?)))
                .collect::<Result<Vec<_>, PartitionError>>()?;
            (edges, false)
        } else if rest.len() == 2 * count {
            let edges = rest
                .iter()
                .tuples()
                .map(|(dst, w)| {
                    let weight = w.parse().map_err(|_| {
                        PartitionError::malformed(line, format!("invalid weight: {w}"))
                    })?;
                    Ok(Edge::weighted(node, parse_node(line, dst)?, weight))
                })
                .collect::<Result<Vec<_>, PartitionError>>()?;
            (edges, true)
        } else {
            return Err(PartitionError::malformed(
                line,
                format!(
                    "{} edges declared but {} trailing fields found",
                    count,
                    rest.len()
                ),
            ));
        };

        Ok(Some(Self {
            node,
            edges,
            weighted,
            line: text.to_string(),
        }))
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbor_group(&self) -> NeighborGroup {
        NeighborGroup::new(self.node, self.edges.iter().map(|e| e.dst))
    }
}

pub struct EdgeGroupReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> EdgeGroupReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl EdgeGroupReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, PartitionError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for EdgeGroupReader<R> {
    type Item = Result<EdgeGroup, PartitionError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match EdgeGroup::parse(self.line, &text) {
                Ok(Some(group)) => return Some(Ok(group)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Read a whole listing into memory.
pub fn read_edge_groups<R: BufRead>(reader: R) -> Result<Vec<EdgeGroup>, PartitionError> {
    EdgeGroupReader::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn weighted_line() {
        let g = EdgeGroup::parse(1, "4 2 7 1.0 9 0.5").unwrap().unwrap();
        assert_eq!(g.node, 4);
        assert!(g.weighted);
        assert_eq!(g.edges, vec![Edge::weighted(4, 7, 1.0), Edge::weighted(4, 9, 0.5)]);
        assert_eq!(g.line, "4 2 7 1.0 9 0.5");
    }

    #[test]
    fn weightless_line() {
        let g = EdgeGroup::parse(1, "4 3 7 9 9").unwrap().unwrap();
        assert!(!g.weighted);
        assert_eq!(g.degree(), 3);
        let ng = g.neighbor_group();
        assert_eq!(ng.node, 4);
        assert_eq!(ng.neighbors.len(), 2);
    }

    #[test]
    fn isolated_node_has_no_edges() {
        let g = EdgeGroup::parse(1, "5 0").unwrap().unwrap();
        assert!(g.edges.is_empty());
        assert!(EdgeGroup::parse(1, "   ").unwrap().is_none());
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        for bad in ["4 2 7 1.0 9", "4", "4 x", "4 1 y", "4 1 7 heavy"] {
            assert!(
                matches!(EdgeGroup::parse(3, bad), Err(PartitionError::Malformed { line: 3, .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn reader_skips_blank_lines() {
        let groups = read_edge_groups(Cursor::new("0 1 1\n\n1 1 0\n")).unwrap();
        assert_eq!(groups.len(), 2);
        let err = read_edge_groups(Cursor::new("0 1 1\n\n1 2 0\n")).unwrap_err();
        assert!(matches!(err, PartitionError::Malformed { line: 3, .. }));
    }
}
