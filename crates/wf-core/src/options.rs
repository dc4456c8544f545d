//! Per-query routing options shared by the search and facade crates.

use std::fmt;

/// What an edge's optimisation cost represents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Weighting {
    /// Physical length in metres (shortest route).
    #[default]
    Distance,
    /// Traversal time in seconds, `length / speed` (fastest route).
    Time,
}

impl Weighting {
    pub fn as_str(self) -> &'static str {
        match self {
            Weighting::Distance => "distance",
            Weighting::Time     => "time",
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which heuristic drives the path search.
///
/// Both variants run the same search loop; Dijkstra is A* with a zero
/// heuristic.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    #[default]
    Dijkstra,
    /// Great-circle distance to the destination as the heuristic.
    AStar,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar    => "astar",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
