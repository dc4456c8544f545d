//! `wf-spatial` — road graph store, spatial indexing, and graph loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`network`] | `RoadGraph` (CSR), `RoadGraphBuilder`, `GraphView`, `GraphConfig` |
//! | [`index`]   | `SpatialIndex` (R-tree on the unit sphere), `Snap`              |
//! | [`loader`]  | `load_graph_csv`, `load_nodes_reader`, `load_edges_reader`      |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `wf-core` types.        |

pub mod error;
pub mod index;
pub mod loader;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use index::{Snap, SpatialIndex};
pub use loader::{load_edges_reader, load_graph_csv, load_nodes_reader};
pub use network::{
    DEFAULT_SPEED_MPS, EdgeInfo, EdgeSpec, GraphConfig, GraphView, Neighbor, Neighbors, NodeSpec,
    RoadGraph, RoadGraphBuilder,
};
