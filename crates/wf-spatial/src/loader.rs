//! CSV graph loader.
//!
//! # CSV format
//!
//! Two files: one row per node, one row per edge.
//!
//! ```csv
//! id,lat,lon
//! 101,12.9716,77.5946
//! 102,12.9721,77.5960
//! ```
//!
//! ```csv
//! from,to,length_m,speed_mps,travel_time_s,bidirectional
//! 101,102,165.0,13.9,,true
//! 102,101,165.0,,20.5,false
//! ```
//!
//! `speed_mps` and `travel_time_s` may be empty (or the columns omitted);
//! see [`EdgeSpec`] for how the traversal time is derived.  `bidirectional`
//! is `true`/`false` and defaults to `false` when the column is absent.
//!
//! Rows are only parsed here; all graph validation happens in
//! [`RoadGraphBuilder::build`](crate::RoadGraphBuilder::build).

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::network::{EdgeSpec, GraphConfig, NodeSpec, RoadGraph};
use crate::SpatialError;

/// Load and build a graph from a node CSV and an edge CSV.
pub fn load_graph_csv(
    nodes_path: &Path,
    edges_path: &Path,
    config: GraphConfig,
) -> Result<RoadGraph, SpatialError> {
    let nodes = load_nodes_reader(std::fs::File::open(nodes_path)?)?;
    let edges = load_edges_reader(std::fs::File::open(edges_path)?)?;
    log::info!(
        "loaded {} node rows from {} and {} edge rows from {}",
        nodes.len(),
        nodes_path.display(),
        edges.len(),
        edges_path.display(),
    );
    RoadGraph::build(nodes, edges, config)
}

/// Parse node rows from any `Read` source (e.g. a `std::io::Cursor` in tests).
pub fn load_nodes_reader<R: Read>(reader: R) -> Result<Vec<NodeSpec>, SpatialError> {
    read_rows(reader, "node")
}

/// Parse edge rows from any `Read` source.
pub fn load_edges_reader<R: Read>(reader: R) -> Result<Vec<EdgeSpec>, SpatialError> {
    read_rows(reader, "edge")
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R, what: &str) -> Result<Vec<T>, SpatialError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .enumerate()
        .map(|(i, row)| {
            // +2: one for the header line, one for 1-based numbering.
            row.map_err(|e| SpatialError::Parse(format!("{what} row {}: {e}", i + 2)))
        })
        .collect()
}
