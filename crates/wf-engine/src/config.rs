//! Engine configuration.
//!
//! All fields have defaults, so a JSON file only needs the keys it changes:
//!
//! ```json
//! {
//!   "algorithm": "astar",
//!   "weighting": "time",
//!   "max_snap_distance_m": 500.0,
//!   "graph": { "default_speed_mps": 11.1 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use wf_core::{Algorithm, Weighting};
use wf_spatial::GraphConfig;

use crate::{EngineError, EngineResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Options used when the engine builds the graph itself
    /// ([`RoutingEngine::from_specs`](crate::RoutingEngine::from_specs),
    /// [`RoutingEngine::load_csv`](crate::RoutingEngine::load_csv)).
    pub graph: GraphConfig,

    /// Search algorithm for requests that do not pick one.
    pub algorithm: Algorithm,

    /// Weighting for requests that do not pick one.
    pub weighting: Weighting,

    /// Upper bound on edge speed assumed by the A* time heuristic.  `None`
    /// uses the fastest edge in the graph.
    pub heuristic_speed_mps: Option<f64>,

    /// Endpoints farther than this from every node fail with
    /// `OutOfCoverage`.  `None` snaps at any distance.
    pub max_snap_distance_m: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            graph:               GraphConfig::default(),
            algorithm:           Algorithm::Dijkstra,
            weighting:           Weighting::Distance,
            heuristic_speed_mps: None,
            max_snap_distance_m: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values no graph could make sense of.
    ///
    /// Graph-dependent checks (A* admissibility) run in
    /// [`RoutingEngine::new`](crate::RoutingEngine::new).
    pub fn validate(&self) -> EngineResult<()> {
        let speed = self.graph.default_speed_mps;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(EngineError::Config(format!(
                "graph.default_speed_mps must be positive, got {speed}"
            )));
        }
        if let Some(bound) = self.heuristic_speed_mps {
            if !(bound.is_finite() && bound > 0.0) {
                return Err(EngineError::Config(format!(
                    "heuristic_speed_mps must be positive, got {bound}"
                )));
            }
        }
        if let Some(limit) = self.max_snap_distance_m {
            if !(limit >= 0.0) {
                return Err(EngineError::Config(format!(
                    "max_snap_distance_m must be non-negative, got {limit}"
                )));
            }
        }
        Ok(())
    }
}
