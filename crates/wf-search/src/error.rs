use thiserror::Error;

use wf_core::{EdgeId, NodeId};
use wf_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("no route from {from} to {to}")]
    NoRouteFound { from: NodeId, to: NodeId },

    /// Negative or non-finite edge weight.  The graph data must be fixed;
    /// retrying the same query cannot succeed.
    #[error("edge {edge} has invalid weight {weight}")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    #[error("inadmissible heuristic: {0}")]
    InvalidHeuristic(String),

    #[error("path has no nodes")]
    EmptyPath,

    #[error("malformed path: {0}")]
    MalformedPath(String),

    #[error("search cancelled")]
    Cancelled,

    #[error(transparent)]
    Graph(#[from] SpatialError),
}

pub type SearchResult<T> = Result<T, SearchError>;
