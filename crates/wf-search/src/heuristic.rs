//! Remaining-cost estimates for A*.
//!
//! A heuristic must never overestimate the true remaining cost (admissible)
//! and must satisfy `h(u) <= w(u, v) + h(v)` on every edge (consistent), or
//! the settled-node invariant breaks and paths stop being optimal.
//! [`GreatCircleHeuristic::new`] refuses configurations where that cannot be
//! guaranteed instead of running with a bad estimate.

use wf_core::{GeoPoint, NodeId, Weighting};
use wf_spatial::GraphView;

use crate::search::COST_EPSILON;
use crate::{SearchError, SearchResult};

/// Slack allowed below a length/straight-line ratio of 1 before the graph is
/// considered unsuitable for a great-circle estimate.  Covers edge lengths
/// measured with a slightly different Earth radius.
pub const LENGTH_RATIO_TOLERANCE: f64 = 1e-3;

/// Lower bound on the remaining cost from `node` to the search target.
pub trait Heuristic {
    fn estimate(&self, node: NodeId) -> f64;
}

/// Always zero: turns the search into plain Dijkstra.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn estimate(&self, _node: NodeId) -> f64 {
        0.0
    }
}

/// Straight-line (haversine) distance to the target, converted to the view's
/// cost unit.
///
/// - `Distance`: metres, scaled down by the graph's minimum
///   length/straight-line ratio when that ratio is a hair below 1.
/// - `Time`: metres divided by a speed bound, which must be at least the
///   fastest effective edge speed in the graph.
#[derive(Clone, Debug)]
pub struct GreatCircleHeuristic<'a> {
    positions:      &'a [GeoPoint],
    target:         GeoPoint,
    cost_per_meter: f64,
}

impl<'a> GreatCircleHeuristic<'a> {
    /// Build an estimate towards `target` for searches over `view`.
    ///
    /// `speed_bound_mps` only applies to time weighting; `None` uses the
    /// graph's fastest edge.
    ///
    /// # Errors
    /// - [`SearchError::UnknownNode`] if `target` is not in the graph.
    /// - [`SearchError::InvalidHeuristic`] if the estimate could overestimate.
    pub fn new(
        view: GraphView<'a>,
        target: NodeId,
        speed_bound_mps: Option<f64>,
    ) -> SearchResult<Self> {
        let graph = view.graph();
        let target_pos = graph.position(target).map_err(|_| SearchError::UnknownNode(target))?;

        let ratio = graph.min_length_ratio();
        if ratio < 1.0 - LENGTH_RATIO_TOLERANCE {
            return Err(SearchError::InvalidHeuristic(format!(
                "some edges are only {ratio:.4}x the straight-line distance between their endpoints"
            )));
        }
        let scale = ratio.min(1.0);

        let cost_per_meter = match view.weighting() {
            Weighting::Distance => scale,
            Weighting::Time => {
                let fastest = graph.max_speed_mps();
                match speed_bound_mps {
                    Some(bound) if !(bound.is_finite() && bound > 0.0) => {
                        return Err(SearchError::InvalidHeuristic(format!(
                            "speed bound {bound} m/s must be positive"
                        )));
                    }
                    Some(bound) if bound < fastest * (1.0 - COST_EPSILON) => {
                        return Err(SearchError::InvalidHeuristic(format!(
                            "speed bound {bound} m/s is below the fastest edge ({fastest:.3} m/s)"
                        )));
                    }
                    // A bound within rounding of the fastest edge counts as equal.
                    Some(bound) => scale / bound.max(fastest),
                    // No edges: nothing to estimate.
                    None if fastest <= 0.0 => 0.0,
                    None => scale / fastest,
                }
            }
        };

        Ok(Self { positions: &graph.node_pos, target: target_pos, cost_per_meter })
    }

    pub fn cost_per_meter(&self) -> f64 {
        self.cost_per_meter
    }
}

impl Heuristic for GreatCircleHeuristic<'_> {
    #[inline]
    fn estimate(&self, node: NodeId) -> f64 {
        self.positions[node.index()].distance_m(self.target) * self.cost_per_meter
    }
}
