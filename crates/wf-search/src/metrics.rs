//! Route totals derived from a settled [`Path`].
//!
//! Distance and time are always summed from the stored edge attributes, so
//! the totals are the same whichever weighting the search optimised.

use wf_core::GeoPoint;
use wf_spatial::RoadGraph;

use crate::{Path, SearchError, SearchResult};

/// Physical length and travel time of a route.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RouteMetrics {
    /// Sum of edge lengths, metres.
    pub distance_m: f64,
    /// Sum of edge travel times, seconds.
    pub duration_s: f64,
}

impl RouteMetrics {
    pub const ZERO: RouteMetrics = RouteMetrics { distance_m: 0.0, duration_s: 0.0 };

    /// Sum the edges of `path` in order.
    ///
    /// A single-node path has zero totals.
    ///
    /// # Errors
    /// - [`SearchError::EmptyPath`] if the path has no nodes.
    /// - [`SearchError::MalformedPath`] if the edges do not chain the nodes.
    /// - [`SearchError::Graph`] if an edge id is not in `graph`.
    pub fn compute(graph: &RoadGraph, path: &Path) -> SearchResult<RouteMetrics> {
        let nodes = path.nodes();
        if nodes.is_empty() {
            return Err(SearchError::EmptyPath);
        }
        if path.edges().len() + 1 != nodes.len() {
            return Err(SearchError::MalformedPath(format!(
                "{} edges cannot join {} nodes",
                path.edges().len(),
                nodes.len()
            )));
        }

        let mut totals = RouteMetrics::ZERO;
        for (i, &edge) in path.edges().iter().enumerate() {
            let info = graph.edge(edge)?;
            if info.from != nodes[i] || info.to != nodes[i + 1] {
                return Err(SearchError::MalformedPath(format!(
                    "edge {edge} does not join {} to {}",
                    nodes[i],
                    nodes[i + 1]
                )));
            }
            totals.distance_m += info.length_m;
            totals.duration_s += info.travel_s;
        }
        Ok(totals)
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1_000.0
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_s / 60.0
    }
}

/// Coordinates of the path's nodes, in order.
pub fn path_coordinates(graph: &RoadGraph, path: &Path) -> SearchResult<Vec<GeoPoint>> {
    path.nodes()
        .iter()
        .map(|&n| graph.position(n).map_err(SearchError::from))
        .collect()
}
