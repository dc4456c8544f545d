//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("coordinate ({lat}, {lon}) is outside the WGS-84 range")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("cannot parse {0:?} as \"lat,lon\"")]
    ParseCoordinate(String),
}

/// Shorthand result type for `wf-core`.
pub type CoreResult<T> = Result<T, CoreError>;
