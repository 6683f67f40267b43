//! Host scoring strategies.
//!
//! A strategy maps a candidate host's current node set and an incoming node's
//! neighbour set to a desirability score. The caller picks the host with the
//! highest score.
//!
//! - `Affinity`: `|host ∩ neighbours| * (1 - |host| / capacity)`
//! - `Balance`:  `1 - |host| / capacity`
//! - `Random`:   uniform in `[0, 1)`, a baseline only

use super::{NodeId, PartitionError};
use hashbrown::HashSet;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Inputs to a single score evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    /// Nodes already committed to the candidate host.
    pub host_nodes: &'a HashSet<NodeId>,
    /// Distinct neighbours of the node being placed.
    pub neighbors: &'a HashSet<NodeId>,
    /// Node capacity each host is measured against.
    pub capacity: f64,
}

impl ScoreInput<'_> {
    /// `1 - |host| / capacity`; zero at capacity, negative beyond it.
    pub fn free_fraction(&self) -> f64 {
        1.0 - self.host_nodes.len() as f64 / self.capacity
    }

    /// Number of the incoming node's neighbours already on the host.
    pub fn overlap(&self) -> usize {
        let (small, large) = if self.host_nodes.len() <= self.neighbors.len() {
            (self.host_nodes, self.neighbors)
        } else {
            (self.neighbors, self.host_nodes)
        };
        small.iter().filter(|n| large.contains(*n)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strategy {
    /// Edge locality, damped by host fullness.
    #[default]
    Affinity,
    /// Host fullness only.
    Balance,
    /// Uniform noise.
    Random,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Affinity, Strategy::Balance, Strategy::Random];

    pub fn score<R: Rng>(self, input: &ScoreInput<'_>, rng: &mut R) -> f64 {
        match self {
            Strategy::Affinity => input.overlap() as f64 * input.free_fraction(),
            Strategy::Balance => input.free_fraction(),
            Strategy::Random => rng.gen_range(0.0..1.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Affinity => "affinity",
            Strategy::Balance => "balance",
            Strategy::Random => "random",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = PartitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            // "greedy" is the historical name of the affinity score
            "affinity" | "greedy" => Ok(Strategy::Affinity),
            "balance" => Ok(Strategy::Balance),
            "random" => Ok(Strategy::Random),
            _ => Err(PartitionError::UnknownStrategy(s.to_string())),
        }
    }
}
