//! `wf-core` — foundational types for the `wayfinder` routing engine.
//!
//! This crate is a dependency of every other `wf-*` crate.  It has no `wf-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `EdgeId`                                     |
//! | [`geo`]       | `GeoPoint`, haversine distance, unit-sphere projection |
//! | [`options`]   | `Weighting`, `Algorithm`                               |
//! | [`error`]     | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod options;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_M, GeoPoint};
pub use ids::{EdgeId, NodeId};
pub use options::{Algorithm, Weighting};
