use super::*;

use super::batch::{NeighborGroup, partition_groups};
use super::streaming::{PlacementRule, partition_stream};

#[test]
fn streaming_and_batch_agree_on_host_count() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)];
    let cfg = PartitionerConfig::with_hosts(3);

    let stream = partition_stream(
        &cfg,
        6,
        edges.iter().map(|&(s, d)| Ok(Edge::new(s, d))),
        |_| Ok(()),
    )
    .unwrap();
    assert_eq!(stream.hosts.len(), 3);
    assert_eq!(stream.assignment.assigned_count(), 6);

    let groups: Vec<NeighborGroup> = (0..6)
        .map(|v| {
            let nbrs = edges
                .iter()
                .filter_map(|&(s, d)| match (s == v, d == v) {
                    (true, _) => Some(d),
                    (_, true) => Some(s),
                    _ => None,
                });
            NeighborGroup::new(v, nbrs)
        })
        .collect();
    let batch = partition_groups(&cfg, &groups).unwrap();
    assert_eq!(batch.host_sizes.len(), 3);
    assert_eq!(batch.assignment.assigned_count(), 6);
}

#[test]
fn streaming_rules_are_reported() {
    let mut rules = Vec::new();
    partition_stream(
        &PartitionerConfig::with_hosts(2),
        4,
        [(0, 1), (1, 0), (2, 3), (1, 2)]
            .into_iter()
            .map(|(s, d)| Ok(Edge::new(s, d))),
        |p| {
            rules.push(p.rule);
            Ok(())
        },
    )
    .unwrap();
    assert_eq!(
        rules,
        vec![
            PlacementRule::FreshPair,
            PlacementRule::Local,
            PlacementRule::FreshPair,
            PlacementRule::CrossHost,
        ]
    );
}
