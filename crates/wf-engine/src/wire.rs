//! JSON request/response contract.
//!
//! ```json
//! { "sourceLat": 12.97, "sourceLon": 77.59, "destLat": 12.95, "destLon": 77.61,
//!   "weighting": "time" }
//! ```
//!
//! ```json
//! { "status": "ok", "path": [{"lat": 12.97, "lon": 77.59}, ...],
//!   "distanceMeters": 3120.4, "etaSeconds": 251.7 }
//! { "status": "error", "kind": "NoRouteFound", "message": "no route from 3 to 9" }
//! ```

use serde::{Deserialize, Serialize};

use wf_core::{Algorithm, GeoPoint, Weighting};

use crate::{EngineResult, ErrorKind, RouteQuery, RouteResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub source_lat: f64,
    pub source_lon: f64,
    pub dest_lat:   f64,
    pub dest_lon:   f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighting:  Option<Weighting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm:  Option<Algorithm>,
}

impl RouteRequest {
    pub fn new(source: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            source_lat: source.lat,
            source_lon: source.lon,
            dest_lat:   destination.lat,
            dest_lon:   destination.lon,
            weighting:  None,
            algorithm:  None,
        }
    }

    /// Build a request from two `"lat,lon"` strings.
    pub fn parse(source: &str, destination: &str) -> EngineResult<Self> {
        Ok(Self::new(source.parse()?, destination.parse()?))
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = Some(weighting);
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    pub fn query(&self) -> RouteQuery {
        RouteQuery {
            source:      GeoPoint::new(self.source_lat, self.source_lon),
            destination: GeoPoint::new(self.dest_lat, self.dest_lon),
            weighting:   self.weighting,
            algorithm:   self.algorithm,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RouteResponse {
    Ok {
        path: Vec<GeoPoint>,
        #[serde(rename = "distanceMeters")]
        distance_meters: f64,
        #[serde(rename = "etaSeconds")]
        eta_seconds: f64,
    },
    Error {
        kind:    ErrorKind,
        message: String,
    },
}

impl RouteResponse {
    pub fn from_result(result: EngineResult<RouteResult>) -> Self {
        match result {
            Ok(route) => RouteResponse::Ok {
                path:            route.coordinates,
                distance_meters: route.distance_m,
                eta_seconds:     route.eta_s,
            },
            Err(e) => RouteResponse::Error { kind: e.kind(), message: e.to_string() },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, RouteResponse::Ok { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            RouteResponse::Ok { .. }          => None,
            RouteResponse::Error { kind, .. } => Some(*kind),
        }
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
