//! [`RoutingEngine`]: snaps coordinates, runs the search, reports the route.

use std::path::Path as FsPath;
use std::time::Instant;

use serde::Serialize;

use wf_core::{Algorithm, GeoPoint, NodeId, Weighting};
use wf_search::{
    CancelToken, GreatCircleHeuristic, Path, RouteMetrics, SearchOutcome, dijkstra,
    path_coordinates, shortest_path,
};
use wf_spatial::{EdgeSpec, NodeSpec, RoadGraph, SpatialIndex, load_graph_csv};

use crate::{
    EngineConfig, EngineError, EngineResult, Endpoint, RouteRequest, RouteResponse,
};

// ── Query / result ────────────────────────────────────────────────────────────

/// One routing question.  Unset options fall back to the engine config.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RouteQuery {
    pub source:      GeoPoint,
    pub destination: GeoPoint,
    pub weighting:   Option<Weighting>,
    pub algorithm:   Option<Algorithm>,
}

impl RouteQuery {
    pub fn new(source: GeoPoint, destination: GeoPoint) -> Self {
        Self { source, destination, weighting: None, algorithm: None }
    }

    pub fn weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = Some(weighting);
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }
}

/// Where a request coordinate landed on the graph.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct SnappedEndpoint {
    /// External id of the snapped node.
    pub node:            u64,
    pub position:        GeoPoint,
    pub snap_distance_m: f64,
}

/// A successful route.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteResult {
    /// External node ids from source to destination.
    pub nodes:       Vec<u64>,
    pub coordinates: Vec<GeoPoint>,
    pub distance_m:  f64,
    pub eta_s:       f64,
    /// Total cost under `weighting` (metres or seconds).
    pub cost:        f64,
    pub weighting:   Weighting,
    pub algorithm:   Algorithm,
    pub source:      SnappedEndpoint,
    pub destination: SnappedEndpoint,
    /// Nodes settled by the search; 0 when both endpoints snap to one node.
    pub settled:     usize,
}

impl RouteResult {
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1_000.0
    }

    pub fn eta_min(&self) -> f64 {
        self.eta_s / 60.0
    }
}

// ── RoutingEngine ─────────────────────────────────────────────────────────────

/// Immutable graph + index + config.  Safe to share across threads.
pub struct RoutingEngine {
    graph:  RoadGraph,
    index:  SpatialIndex,
    config: EngineConfig,
}

impl RoutingEngine {
    /// Wrap an already-built graph.
    ///
    /// # Errors
    /// - [`EngineError::Config`] for an invalid config, or an A* default the
    ///   graph cannot support (see
    ///   [`GreatCircleHeuristic::new`]).
    /// - `EmptyGraph` if the graph has no nodes.
    pub fn new(graph: RoadGraph, config: EngineConfig) -> EngineResult<Self> {
        let started = Instant::now();
        config.validate()?;
        let index = SpatialIndex::build(&graph)?;

        if config.algorithm == Algorithm::AStar {
            // Any node will do as the target: admissibility depends only on
            // the graph's length ratio and speeds.
            for weighting in [Weighting::Distance, Weighting::Time] {
                GreatCircleHeuristic::new(
                    graph.view(weighting),
                    NodeId(0),
                    config.heuristic_speed_mps,
                )
                .map_err(|e| EngineError::Config(format!("A* with {weighting} weighting: {e}")))?;
            }
        }

        log::info!(
            "routing engine ready: {} nodes, {} edges, default {} / {} in {:.1?}",
            graph.node_count(),
            graph.edge_count(),
            config.algorithm,
            config.weighting,
            started.elapsed(),
        );
        Ok(Self { graph, index, config })
    }

    /// Build the graph from records using `config.graph`, then [`new`](Self::new).
    pub fn from_specs<N, E>(nodes: N, edges: E, config: EngineConfig) -> EngineResult<Self>
    where
        N: IntoIterator<Item = NodeSpec>,
        E: IntoIterator<Item = EdgeSpec>,
    {
        config.validate()?;
        let graph = RoadGraph::build(nodes, edges, config.graph.clone())?;
        Self::new(graph, config)
    }

    /// Load node and edge CSV files using `config.graph`, then [`new`](Self::new).
    pub fn load_csv(nodes: &FsPath, edges: &FsPath, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let graph = load_graph_csv(nodes, edges, config.graph.clone())?;
        Self::new(graph, config)
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Route between two coordinates with the configured algorithm.
    pub fn route(
        &self,
        source: GeoPoint,
        destination: GeoPoint,
        weighting: Weighting,
    ) -> EngineResult<RouteResult> {
        self.route_with(&RouteQuery::new(source, destination).weighting(weighting), None)
    }

    /// Route with per-query overrides and optional cancellation.
    ///
    /// When both coordinates snap to the same node the result is a
    /// single-node, zero-length route and no search runs.
    pub fn route_with(
        &self,
        query: &RouteQuery,
        cancel: Option<&CancelToken>,
    ) -> EngineResult<RouteResult> {
        let started   = Instant::now();
        let weighting = query.weighting.unwrap_or(self.config.weighting);
        let algorithm = query.algorithm.unwrap_or(self.config.algorithm);

        let (from, source)      = self.snap(query.source, Endpoint::Source)?;
        let (to, destination)   = self.snap(query.destination, Endpoint::Destination)?;

        let (path, settled) = if from == to {
            (Path::single(from), 0)
        } else {
            let SearchOutcome { path, settled, .. } = self.search(from, to, weighting, algorithm, cancel)?;
            (path, settled)
        };

        let metrics     = RouteMetrics::compute(&self.graph, &path)?;
        let coordinates = path_coordinates(&self.graph, &path)?;
        let nodes = path
            .nodes()
            .iter()
            .map(|&n| self.graph.external_id(n))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "{algorithm}/{weighting} route {} -> {}: {} nodes, {:.1} m, {:.1} s, {settled} settled in {:.1?}",
            source.node,
            destination.node,
            nodes.len(),
            metrics.distance_m,
            metrics.duration_s,
            started.elapsed(),
        );

        Ok(RouteResult {
            nodes,
            coordinates,
            distance_m: metrics.distance_m,
            eta_s: metrics.duration_s,
            cost: path.cost(),
            weighting,
            algorithm,
            source,
            destination,
            settled,
        })
    }

    /// Answer a wire request.  Failures become `status: "error"` responses.
    pub fn handle(&self, request: &RouteRequest) -> RouteResponse {
        let result = self.route_with(&request.query(), None);
        if let Err(e) = &result {
            log::warn!("route request failed ({}): {e}", e.kind());
        }
        RouteResponse::from_result(result)
    }

    /// Answer many requests.  Responses are in request order.
    pub fn handle_batch(&self, requests: &[RouteRequest]) -> Vec<RouteResponse> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            requests.par_iter().map(|r| self.handle(r)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            requests.iter().map(|r| self.handle(r)).collect()
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn snap(&self, pos: GeoPoint, endpoint: Endpoint) -> EngineResult<(NodeId, SnappedEndpoint)> {
        let pos  = pos.validated()?;
        let snap = self.index.nearest_with_distance(pos)?;

        if let Some(limit_m) = self.config.max_snap_distance_m {
            if snap.distance_m > limit_m {
                return Err(EngineError::OutOfCoverage {
                    endpoint,
                    pos,
                    distance_m: snap.distance_m,
                    limit_m,
                });
            }
        }

        let snapped = SnappedEndpoint {
            node:            self.graph.external_id(snap.node)?,
            position:        self.graph.position(snap.node)?,
            snap_distance_m: snap.distance_m,
        };
        Ok((snap.node, snapped))
    }

    fn search(
        &self,
        from: NodeId,
        to: NodeId,
        weighting: Weighting,
        algorithm: Algorithm,
        cancel: Option<&CancelToken>,
    ) -> EngineResult<SearchOutcome> {
        let view = self.graph.view(weighting);
        let outcome = match algorithm {
            Algorithm::Dijkstra => dijkstra(&view, from, to, cancel)?,
            Algorithm::AStar => {
                let heuristic =
                    GreatCircleHeuristic::new(view, to, self.config.heuristic_speed_mps)?;
                shortest_path(&view, from, to, &heuristic, cancel)?
            }
        };
        Ok(outcome)
    }
}
