//! # hostpart
//!
//! hostpart assigns the nodes and edges of a large graph to a fixed number of
//! hosts for distributed processing. It keeps cross-host edges low while
//! holding every host near an even share of the nodes.
//!
//! ## Features
//! - Batch greedy partitioning over materialised neighbour groups, with
//!   affinity, balance and random scoring
//! - Single-pass streaming partitioning of raw edge listings with a shared,
//!   growing node ceiling
//! - Cut, borrowed-node and imbalance metrics for finished assignments
//! - Readers and writers for edge-group, raw edge and node-map listings
//!
//! ## Determinism
//!
//! All randomized decisions use `SmallRng` seeds drawn from
//! [`PartitionerConfig::rng_seed`](partitioning::PartitionerConfig::rng_seed),
//! so runs are reproducible. The streaming partitioner uses no randomness and
//! depends only on edge order.
//!
//! ## Usage
//! ```
//! use hostpart::prelude::*;
//!
//! let cfg = PartitionerConfig::with_hosts(2);
//! let mut p = StreamingPartitioner::new(&cfg, 4).unwrap();
//! for (s, d) in [(0, 1), (1, 2), (2, 3)] {
//!     p.place(s, d).unwrap();
//! }
//! let out = p.finish();
//! assert_eq!(out.assignment.assigned_count(), 4);
//! ```

pub mod debug_invariants;
pub mod io;
pub mod partitioning;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{ListingFormat, evaluate_cuts, run_batch, run_stream};
    pub use crate::partitioning::batch::{BatchPartitioner, NeighborGroup, partition_groups};
    pub use crate::partitioning::streaming::{
        EdgePlacement, PlacementRule, StreamingPartitioner, partition_stream,
    };
    pub use crate::partitioning::{
        CapacityTracker, CutReport, Edge, HostAssignment, HostId, HostState, NodeId,
        PartitionError, PartitionerConfig, Strategy, count_cuts,
    };
}
