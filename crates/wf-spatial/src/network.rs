//! Road graph store and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the `EdgeId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`, `edge_travel_s`)
//! are sorted by `(source, destination)` and indexed by `EdgeId`.  Iteration
//! over a node's outgoing edges is a contiguous memory scan, and the order is
//! fixed once the graph is built.
//!
//! # Identifiers
//!
//! Callers name nodes with arbitrary `u64` ids (e.g. OSM ids).  `build()`
//! sorts nodes by that id and assigns dense `NodeId`s in the same order, so
//! "lowest `NodeId`" and "lowest external id" are the same tie-break.
//!
//! # Weighting
//!
//! Every edge stores both its physical length and its traversal time.  A
//! [`GraphView`] picks which of the two is exposed as the search weight;
//! [`GraphConfig::weighting`] selects the view used by
//! [`RoadGraph::neighbors`].

use std::ops::Range;
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use wf_core::{EdgeId, GeoPoint, NodeId, Weighting};

use crate::{SpatialError, SpatialResult};

/// Speed assumed for edges that carry neither a speed nor a travel time.
/// Roughly 50 km/h, a typical urban limit.
pub const DEFAULT_SPEED_MPS: f64 = 13.89;

// ── Input records ─────────────────────────────────────────────────────────────

/// A node as supplied by the map data provider.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id:  u64,
    pub lat: f64,
    pub lon: f64,
}

impl NodeSpec {
    pub fn new(id: u64, pos: GeoPoint) -> Self {
        Self { id, lat: pos.lat, lon: pos.lon }
    }

    pub fn pos(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// An edge as supplied by the map data provider.
///
/// The traversal time is `travel_time_s` when present, otherwise
/// `length_m / speed_mps`, otherwise `length_m / GraphConfig::default_speed_mps`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from:     u64,
    pub to:       u64,
    pub length_m: f64,
    #[serde(default)]
    pub speed_mps: Option<f64>,
    #[serde(default)]
    pub travel_time_s: Option<f64>,
    /// Also add the reverse edge `to → from` with the same attributes.
    #[serde(default)]
    pub bidirectional: bool,
}

impl EdgeSpec {
    /// A one-way edge with a known average speed.
    pub fn directed(from: u64, to: u64, length_m: f64, speed_mps: f64) -> Self {
        Self {
            from,
            to,
            length_m,
            speed_mps: Some(speed_mps),
            travel_time_s: None,
            bidirectional: false,
        }
    }

    /// A two-way road segment with a known average speed.
    pub fn road(a: u64, b: u64, length_m: f64, speed_mps: f64) -> Self {
        Self { bidirectional: true, ..Self::directed(a, b, length_m, speed_mps) }
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Build-time options for a [`RoadGraph`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// Weight exposed by [`RoadGraph::neighbors`].
    pub weighting: Weighting,
    /// Fallback speed for edges without speed or travel time.
    pub default_speed_mps: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { weighting: Weighting::Distance, default_speed_mps: DEFAULT_SPEED_MPS }
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format.
///
/// Vector fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadGraphBuilder`] or [`RoadGraph::build`].
/// The graph is never mutated after `build`, so a shared `&RoadGraph` may be
/// used by any number of concurrent searches.
#[derive(Debug)]
pub struct RoadGraph {
    // ── Node data (indexed by NodeId) ─────────────────────────────────────
    /// Geographic position of each node.
    pub node_pos: Vec<GeoPoint>,

    /// Caller-supplied id of each node, ascending.
    pub node_external: Vec<u64>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Physical length in metres.
    pub edge_length_m: Vec<f64>,

    /// Traversal time in seconds.
    pub edge_travel_s: Vec<f64>,

    external_to_node: FxHashMap<u64, NodeId>,
    config: GraphConfig,
    max_speed_mps: f64,
    min_length_ratio: f64,
}

/// One outgoing edge as seen by the path search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub node:   NodeId,
    pub edge:   EdgeId,
    pub weight: f64,
}

/// All stored attributes of one directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeInfo {
    pub from:     NodeId,
    pub to:       NodeId,
    pub length_m: f64,
    pub travel_s: f64,
}

impl RoadGraph {
    /// Build a graph from provider records in one call.
    pub fn build<N, E>(nodes: N, edges: E, config: GraphConfig) -> SpatialResult<RoadGraph>
    where
        N: IntoIterator<Item = NodeSpec>,
        E: IntoIterator<Item = EdgeSpec>,
    {
        let mut b = RoadGraphBuilder::with_config(config);
        for n in nodes {
            b.push_node(n);
        }
        for e in edges {
            b.add_edge(e);
        }
        b.build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Identifier mapping ────────────────────────────────────────────────

    /// Map a caller-supplied id to its dense `NodeId`.
    pub fn resolve(&self, external: u64) -> SpatialResult<NodeId> {
        self.external_to_node
            .get(&external)
            .copied()
            .ok_or(SpatialError::UnknownExternalId(external))
    }

    pub fn external_id(&self, node: NodeId) -> SpatialResult<u64> {
        self.node_external
            .get(node.index())
            .copied()
            .ok_or(SpatialError::UnknownNode(node))
    }

    pub fn position(&self, node: NodeId) -> SpatialResult<GeoPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::UnknownNode(node))
    }

    pub fn edge(&self, edge: EdgeId) -> SpatialResult<EdgeInfo> {
        let i = edge.index();
        if i >= self.edge_count() {
            return Err(SpatialError::UnknownEdge(edge));
        }
        Ok(EdgeInfo {
            from:     self.edge_from[i],
            to:       self.edge_to[i],
            length_m: self.edge_length_m[i],
            travel_s: self.edge_travel_s[i],
        })
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// # Panics
    /// Panics if `node` is not in the graph; see [`contains`](Self::contains).
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_range(node).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node`, or `UnknownNode`.
    pub fn out_degree(&self, node: NodeId) -> SpatialResult<usize> {
        if !self.contains(node) {
            return Err(SpatialError::UnknownNode(node));
        }
        Ok(self.out_range(node).len())
    }

    /// Outgoing `(neighbour, weight)` pairs of `node` under the configured
    /// weighting.  Empty for nodes without outgoing edges.
    pub fn neighbors(&self, node: NodeId) -> SpatialResult<Neighbors<'_>> {
        self.view(self.config.weighting).neighbors(node)
    }

    /// A view exposing edge weights under `weighting`.
    pub fn view(&self, weighting: Weighting) -> GraphView<'_> {
        GraphView { graph: self, weighting }
    }

    #[inline]
    fn out_range(&self, node: NodeId) -> Range<usize> {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    // ── Statistics for heuristic validation ───────────────────────────────

    /// Highest edge speed in m/s: the supplied `speed_mps`, else `length / travel time`.
    /// `0.0` for a graph without edges.
    pub fn max_speed_mps(&self) -> f64 {
        self.max_speed_mps
    }

    /// Smallest ratio of edge length to the great-circle distance between
    /// its endpoints.  `f64::INFINITY` when no edge joins distinct positions.
    ///
    /// A value below 1 means some edge is shorter than the straight line,
    /// which makes a great-circle heuristic overestimate.
    pub fn min_length_ratio(&self) -> f64 {
        self.min_length_ratio
    }
}

// ── GraphView ─────────────────────────────────────────────────────────────────

/// A [`RoadGraph`] paired with the weighting used as edge cost.
#[derive(Copy, Clone, Debug)]
pub struct GraphView<'a> {
    graph: &'a RoadGraph,
    weighting: Weighting,
}

impl<'a> GraphView<'a> {
    pub fn graph(&self) -> &'a RoadGraph {
        self.graph
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Cost of traversing `edge` under this view's weighting.
    #[inline]
    pub fn weight(&self, edge: EdgeId) -> f64 {
        match self.weighting {
            Weighting::Distance => self.graph.edge_length_m[edge.index()],
            Weighting::Time     => self.graph.edge_travel_s[edge.index()],
        }
    }

    /// Checked neighbour iteration; `UnknownNode` if `node` is not present.
    pub fn neighbors(&self, node: NodeId) -> SpatialResult<Neighbors<'a>> {
        if !self.graph.contains(node) {
            return Err(SpatialError::UnknownNode(node));
        }
        Ok(self.iter_neighbors(node))
    }

    /// Unchecked neighbour iteration for callers that validated `node`.
    ///
    /// # Panics
    /// Panics if `node` is not in the graph.
    #[inline]
    pub fn iter_neighbors(&self, node: NodeId) -> Neighbors<'a> {
        Neighbors { view: *self, edges: self.graph.out_range(node) }
    }
}

/// Iterator over a node's outgoing edges, in `EdgeId` order.
#[derive(Clone, Debug)]
pub struct Neighbors<'a> {
    view:  GraphView<'a>,
    edges: Range<usize>,
}

impl Iterator for Neighbors<'_> {
    type Item = Neighbor;

    #[inline]
    fn next(&mut self) -> Option<Neighbor> {
        let i = self.edges.next()?;
        let edge = EdgeId(i as u32);
        Some(Neighbor {
            node:   self.view.graph.edge_to[i],
            edge,
            weight: self.view.weight(edge),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.edges.size_hint()
    }
}

impl ExactSizeIterator for Neighbors<'_> {}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and edges in any order; all validation happens
/// in `build()`, which reports the first problem as
/// [`SpatialError::InvalidGraph`].
///
/// # Example
///
/// ```
/// use wf_core::GeoPoint;
/// use wf_spatial::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// b.add_node(10, GeoPoint::new(12.97, 77.59));
/// b.add_node(20, GeoPoint::new(12.98, 77.60));
/// b.add_road(10, 20, 1_500.0, 13.9);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    config: GraphConfig,
    nodes:  Vec<NodeSpec>,
    edges:  Vec<EdgeSpec>,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length_m:  f64,
    travel_s:  f64,
    /// Supplied speed if any, so the statistics are not skewed by rounding
    /// in `length / (length / speed)`.
    speed_mps: f64,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self { config, nodes: Vec::new(), edges: Vec::new() }
    }

    pub fn add_node(&mut self, id: u64, pos: GeoPoint) {
        self.nodes.push(NodeSpec::new(id, pos));
    }

    pub fn push_node(&mut self, node: NodeSpec) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: EdgeSpec) {
        self.edges.push(edge);
    }

    /// Add a **directed** edge `from → to`.
    pub fn add_directed_edge(&mut self, from: u64, to: u64, length_m: f64, speed_mps: f64) {
        self.edges.push(EdgeSpec::directed(from, to, length_m, speed_mps));
    }

    /// Convenience: add edges in **both directions** for an undirected road
    /// segment.
    pub fn add_road(&mut self, a: u64, b: u64, length_m: f64, speed_mps: f64) {
        self.edges.push(EdgeSpec::road(a, b, length_m, speed_mps));
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Validate the inputs and produce an immutable [`RoadGraph`].
    ///
    /// Time complexity: O(N log N + E log E).
    pub fn build(self) -> SpatialResult<RoadGraph> {
        let started = Instant::now();
        let default_speed = self.config.default_speed_mps;
        if !(default_speed.is_finite() && default_speed > 0.0) {
            return Err(invalid(format!("default speed {default_speed} m/s must be positive")));
        }

        // ── Nodes: sort by external id, assign dense ids ──────────────────
        let mut nodes = self.nodes;
        nodes.sort_unstable_by_key(|n| n.id);

        if u32::try_from(nodes.len()).map_or(true, |n| n == u32::MAX) {
            return Err(invalid(format!("{} nodes exceed the NodeId range", nodes.len())));
        }

        let mut external_to_node =
            FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());
        for (i, n) in nodes.iter().enumerate() {
            if !n.pos().is_valid() {
                return Err(invalid(format!("node {} has invalid position {}", n.id, n.pos())));
            }
            if external_to_node.insert(n.id, NodeId(i as u32)).is_some() {
                return Err(invalid(format!("duplicate node id {}", n.id)));
            }
        }
        let node_pos: Vec<GeoPoint> = nodes.iter().map(NodeSpec::pos).collect();
        let node_external: Vec<u64> = nodes.iter().map(|n| n.id).collect();

        // ── Edges: resolve, validate, expand bidirectional ────────────────
        let mut raw: Vec<RawEdge> = Vec::with_capacity(self.edges.len() * 2);
        for (i, e) in self.edges.iter().enumerate() {
            let endpoint = |id: u64| {
                external_to_node.get(&id).copied().ok_or_else(|| {
                    invalid(format!("edge #{i} ({} -> {}) references unknown node {id}", e.from, e.to))
                })
            };
            let from = endpoint(e.from)?;
            let to   = endpoint(e.to)?;

            if !positive(e.length_m) {
                return Err(invalid(format!("edge #{i} has non-positive length {} m", e.length_m)));
            }
            if let Some(speed) = e.speed_mps {
                if !positive(speed) {
                    return Err(invalid(format!("edge #{i} has non-positive speed {speed} m/s")));
                }
            }
            let (travel_s, speed_mps) = match (e.travel_time_s, e.speed_mps) {
                (Some(t), _) if positive(t) => (t, e.length_m / t),
                (Some(t), _) => {
                    return Err(invalid(format!("edge #{i} has non-positive travel time {t} s")));
                }
                (None, Some(speed)) => (e.length_m / speed, speed),
                (None, None) => (e.length_m / default_speed, default_speed),
            };

            raw.push(RawEdge { from, to, length_m: e.length_m, travel_s, speed_mps });
            if e.bidirectional {
                raw.push(RawEdge { from: to, to: from, length_m: e.length_m, travel_s, speed_mps });
            }
        }

        if u32::try_from(raw.len()).map_or(true, |n| n == u32::MAX) {
            return Err(invalid(format!("{} edges exceed the EdgeId range", raw.len())));
        }

        // Stable sort keeps insertion order among parallel edges.
        raw.sort_by_key(|e| (e.from, e.to));

        let node_count = node_pos.len();
        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();
        let edge_travel_s: Vec<f64>    = raw.iter().map(|e| e.travel_s).collect();

        // ── CSR row pointer ───────────────────────────────────────────────
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        // ── Statistics ────────────────────────────────────────────────────
        let mut max_speed_mps: f64 = 0.0;
        let mut min_length_ratio = f64::INFINITY;
        for e in &raw {
            max_speed_mps = max_speed_mps.max(e.speed_mps);
            let straight = node_pos[e.from.index()].distance_m(node_pos[e.to.index()]);
            if straight > 0.0 {
                min_length_ratio = min_length_ratio.min(e.length_m / straight);
            }
        }

        log::info!(
            "road graph built: {} nodes, {} directed edges in {:.1?}",
            node_count,
            raw.len(),
            started.elapsed(),
        );

        Ok(RoadGraph {
            node_pos,
            node_external,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_travel_s,
            external_to_node,
            config: self.config,
            max_speed_mps,
            min_length_ratio,
        })
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn invalid(msg: String) -> SpatialError {
    SpatialError::InvalidGraph(msg)
}
