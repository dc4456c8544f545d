//! Engine error type and the flat error kinds reported on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wf_core::{CoreError, GeoPoint};
use wf_search::SearchError;
use wf_spatial::SpatialError;

/// Which end of a route a per-endpoint error refers to.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Source,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Source      => "source",
            Endpoint::Destination => "destination",
        })
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("{endpoint} {pos} is {distance_m:.1} m from the nearest node (limit {limit_m:.1} m)")]
    OutOfCoverage {
        endpoint:   Endpoint,
        pos:        GeoPoint,
        distance_m: f64,
        limit_m:    f64,
    },

    #[error("invalid engine configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Flat classification of every failure a caller can observe.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidGraph,
    UnknownNode,
    EmptyGraph,
    NoNodesAvailable,
    NoRouteFound,
    InvalidWeight,
    EmptyPath,
    InvalidPath,
    Cancelled,
    InvalidCoordinate,
    OutOfCoverage,
    InvalidConfig,
    Io,
}

impl ErrorKind {
    /// Whether repeating the same request could succeed.
    ///
    /// Only a cancelled search can; every other kind is a property of the
    /// request or of the loaded graph.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Cancelled)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<&SpatialError> for ErrorKind {
    fn from(e: &SpatialError) -> Self {
        match e {
            SpatialError::InvalidGraph(_) | SpatialError::Parse(_) => ErrorKind::InvalidGraph,
            SpatialError::UnknownNode(_)
            | SpatialError::UnknownExternalId(_)
            | SpatialError::UnknownEdge(_) => ErrorKind::UnknownNode,
            SpatialError::EmptyGraph       => ErrorKind::EmptyGraph,
            SpatialError::NoNodesAvailable => ErrorKind::NoNodesAvailable,
            SpatialError::Io(_)            => ErrorKind::Io,
            SpatialError::InvalidCoordinate { .. } => ErrorKind::InvalidCoordinate,
        }
    }
}

impl From<&SearchError> for ErrorKind {
    fn from(e: &SearchError) -> Self {
        match e {
            SearchError::UnknownNode(_)       => ErrorKind::UnknownNode,
            SearchError::NoRouteFound { .. }  => ErrorKind::NoRouteFound,
            SearchError::InvalidWeight { .. } => ErrorKind::InvalidWeight,
            SearchError::InvalidHeuristic(_)  => ErrorKind::InvalidConfig,
            SearchError::EmptyPath            => ErrorKind::EmptyPath,
            SearchError::MalformedPath(_)     => ErrorKind::InvalidPath,
            SearchError::Cancelled            => ErrorKind::Cancelled,
            SearchError::Graph(inner)         => inner.into(),
        }
    }
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Core(_)                => ErrorKind::InvalidCoordinate,
            EngineError::Spatial(e)             => e.into(),
            EngineError::Search(e)              => e.into(),
            EngineError::OutOfCoverage { .. }   => ErrorKind::OutOfCoverage,
            EngineError::Config(_)
            | EngineError::Json(_)              => ErrorKind::InvalidConfig,
            EngineError::Io(_)                  => ErrorKind::Io,
        }
    }
}
