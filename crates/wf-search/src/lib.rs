//! `wf-search` — shortest-path search and route metrics.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`search`]    | `shortest_path`, `dijkstra`, `SearchGraph`, `SearchOutcome`   |
//! | [`heuristic`] | `Heuristic` trait, `ZeroHeuristic`, `GreatCircleHeuristic`    |
//! | [`path`]      | `Path`                                                        |
//! | [`metrics`]   | `RouteMetrics`, `path_coordinates`                            |
//! | [`cancel`]    | `CancelToken`                                                 |
//! | [`error`]     | `SearchError`, `SearchResult<T>`                              |
//!
//! # One algorithm
//!
//! Dijkstra and A* share a single search loop.  The only difference is the
//! [`Heuristic`] passed in: [`ZeroHeuristic`] gives Dijkstra, a
//! [`GreatCircleHeuristic`] gives A*.  Both therefore share the same
//! settled-node invariant, weight checks and tie-breaking.

pub mod cancel;
pub mod error;
pub mod heuristic;
pub mod metrics;
pub mod path;
pub mod search;


pub use cancel::CancelToken;
pub use error::{SearchError, SearchResult};
pub use heuristic::{GreatCircleHeuristic, Heuristic, ZeroHeuristic};
pub use metrics::{RouteMetrics, path_coordinates};
pub use path::Path;
pub use search::{SearchGraph, SearchOutcome, dijkstra, shortest_path};
