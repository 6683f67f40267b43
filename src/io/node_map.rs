//! Node → host maps: `node host` per line.
//!
//! Writers emit assigned nodes only, in node order. Readers also accept a host
//! of `-1` for a node without a host.

use super::edge_list::parse_node;
use crate::partitioning::{HostAssignment, PartitionError};
use itertools::Itertools;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub fn read_node_map<R: BufRead>(
    reader: R,
    num_nodes: usize,
) -> Result<HostAssignment, PartitionError> {
    let mut assignment = HostAssignment::new(num_nodes);
    for (idx, text) in reader.lines().enumerate() {
        let line = idx + 1;
        let text = text?;
        if text.trim().is_empty() {
            continue;
        }
        let (node, host) = text
            .split_whitespace()
            .collect_tuple()
            .ok_or_else(|| PartitionError::malformed(line, "expected `node host`"))?;
        let node = parse_node(line, node)?;
        let host: i64 = host
            .parse()
            .map_err(|_| PartitionError::malformed(line, format!("invalid host: {host}")))?;
        if node >= num_nodes {
            return Err(PartitionError::NodeOutOfRange {
                node,
                total: num_nodes,
            });
        }
        match host {
            -1 => continue,
            h if h < 0 => {
                return Err(PartitionError::malformed(line, format!("invalid host: {h}")));
            }
            h => assignment.assign(node, h as usize)?,
        }
    }
    Ok(assignment)
}

pub fn load_node_map(path: &Path, num_nodes: usize) -> Result<HostAssignment, PartitionError> {
    read_node_map(BufReader::new(File::open(path)?), num_nodes)
}

pub fn write_node_map<W: Write>(out: &mut W, assignment: &HostAssignment) -> std::io::Result<()> {
    for (node, host) in assignment.iter_assigned() {
        writeln!(out, "{} {}", node, host)?;
    }
    Ok(())
}

pub fn save_node_map(path: &Path, assignment: &HostAssignment) -> Result<(), PartitionError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_node_map(&mut out, assignment)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn write_then_read() {
        let mut a = HostAssignment::new(4);
        a.assign(3, 1).unwrap();
        a.assign(0, 0).unwrap();
        let mut buf = Vec::new();
        write_node_map(&mut buf, &a).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "0 0\n3 1\n");
        assert_eq!(read_node_map(Cursor::new(buf), 4).unwrap(), a);
    }

    #[test]
    fn minus_one_means_unassigned() {
        let a = read_node_map(Cursor::new("0 1\n1 -1\n\n2 0\n"), 3).unwrap();
        assert_eq!(a.as_slice(), &[Some(1), None, Some(0)]);
    }

    #[test]
    fn rejects_bad_records() {
        assert!(matches!(
            read_node_map(Cursor::new("5 0\n"), 3),
            Err(PartitionError::NodeOutOfRange { node: 5, total: 3 })
        ));
        assert!(matches!(
            read_node_map(Cursor::new("0 -2\n"), 3),
            Err(PartitionError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            read_node_map(Cursor::new("0 1\n0\n"), 3),
            Err(PartitionError::Malformed { line: 2, .. })
        ));
        assert!(matches!(
            read_node_map(Cursor::new("0 1\n0 0\n"), 3),
            Err(PartitionError::Reassignment { node: 0, .. })
        ));
    }
}
