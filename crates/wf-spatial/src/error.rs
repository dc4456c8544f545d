//! Spatial-subsystem error type.

use thiserror::Error;

use wf_core::{EdgeId, NodeId};

/// Errors produced by `wf-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("node with external id {0} not found in graph")]
    UnknownExternalId(u64),

    #[error("edge {0} not found in graph")]
    UnknownEdge(EdgeId),

    #[error("cannot index an empty graph")]
    EmptyGraph,

    #[error("spatial index holds no nodes")]
    NoNodesAvailable,

    #[error("query coordinate ({lat}, {lon}) is outside the WGS-84 range")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("graph file parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
