//! `wf-engine` — "coordinates in, route out".
//!
//! # Request flow
//!
//! ```text
//! RouteRequest ─▶ RoutingEngine::handle
//!                   ① validate coordinates
//!                   ② snap source and destination  (SpatialIndex)
//!                   ③ same node? → zero-length success, no search
//!                   ④ Dijkstra / A* over the graph  (wf-search)
//!                   ⑤ distance + ETA               (RouteMetrics)
//!               ◀─ RouteResponse { status: "ok" | "error", … }
//! ```
//!
//! The engine owns an immutable [`RoadGraph`](wf_spatial::RoadGraph) and its
//! [`SpatialIndex`](wf_spatial::SpatialIndex).  It is `Send + Sync`; share it
//! behind an `Arc` or a plain reference and call `route`/`handle` from as
//! many threads as needed.  Every search allocates its own state.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `handle_batch` runs on Rayon's thread pool.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wf_engine::{EngineConfig, RouteRequest, RoutingEngine};
//!
//! let engine = RoutingEngine::from_specs(nodes, edges, EngineConfig::default())?;
//! let response = engine.handle(&RouteRequest::parse("12.97,77.59", "12.95,77.61")?);
//! println!("{}", response.to_json()?);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod wire;


pub use config::EngineConfig;
pub use engine::{RouteQuery, RouteResult, RoutingEngine, SnappedEndpoint};
pub use error::{Endpoint, EngineError, EngineResult, ErrorKind};
pub use wire::{RouteRequest, RouteResponse};

pub use wf_core::{Algorithm, GeoPoint, Weighting};
pub use wf_search::CancelToken;
