//! Best-first shortest-path search (Dijkstra / A*).
//!
//! # State machine
//!
//! A node is settled once its lowest cost is final.  A min-priority queue
//! keyed by `cost + heuristic` drives expansion:
//!
//! 1. The source enters the frontier with cost 0.
//! 2. Pop the lowest key.  Entries for already-settled nodes are stale and
//!    dropped.  Popping the destination ends the search.  Otherwise settle
//!    the node and relax each outgoing edge; a neighbour whose best known
//!    cost improves gets a new predecessor and a fresh queue entry.
//! 3. An empty frontier means the destination is unreachable.
//!
//! # Bounds
//!
//! A node is settled at most once and relaxes each outgoing edge once, so at
//! most `E + 1` entries are ever pushed and the loop runs at most that many
//! times.
//!
//! # Determinism
//!
//! Costs are compared with a relative epsilon.  Queue ties pop the lowest
//! `NodeId` first, and when two predecessors reach a node at equal cost the
//! lower `NodeId` wins.  Identical inputs give identical paths.
//!
//! All per-search state lives in local vectors; the graph is only read.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use wf_core::{EdgeId, NodeId};
use wf_spatial::{GraphView, Neighbor};

use crate::{CancelToken, Heuristic, Path, SearchError, SearchResult, ZeroHeuristic};

/// Relative tolerance for cost comparisons.
pub const COST_EPSILON: f64 = 1e-9;

// ── SearchGraph ───────────────────────────────────────────────────────────────

/// Read-only adjacency the search runs over.
///
/// Implemented for [`GraphView`]; tests implement it for synthetic graphs.
/// Node ids must be dense in `0..node_count()`.
pub trait SearchGraph {
    fn node_count(&self) -> usize;

    /// Outgoing edges of a node known to be in range, in a stable order.
    fn neighbors(&self, node: NodeId) -> impl Iterator<Item = Neighbor> + '_;
}

impl SearchGraph for GraphView<'_> {
    #[inline]
    fn node_count(&self) -> usize {
        self.graph().node_count()
    }

    #[inline]
    fn neighbors(&self, node: NodeId) -> impl Iterator<Item = Neighbor> + '_ {
        self.iter_neighbors(node)
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// A found path plus expansion statistics.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub path: Path,
    /// Nodes settled before the destination was popped.
    pub settled: usize,
    /// Entries pushed onto the frontier, stale ones included.
    pub pushed: usize,
}

// ── Frontier entry ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct FrontierEntry {
    priority: f64,
    node:     NodeId,
}

// `BinaryHeap` is a max-heap: "greater" here means lower priority, then
// lower NodeId.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

// ── Cost comparison ───────────────────────────────────────────────────────────

#[inline]
fn tolerance(a: f64, b: f64) -> f64 {
    COST_EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// `a < b` by more than the tolerance.
#[inline]
fn definitely_less(a: f64, b: f64) -> bool {
    if b.is_infinite() {
        return a < b;
    }
    a < b - tolerance(a, b)
}

#[inline]
fn approx_eq(a: f64, b: f64) -> bool {
    a.is_finite() && b.is_finite() && (a - b).abs() <= tolerance(a, b)
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Plain Dijkstra: [`shortest_path`] with a [`ZeroHeuristic`].
pub fn dijkstra<G: SearchGraph>(
    graph: &G,
    source: NodeId,
    target: NodeId,
    cancel: Option<&CancelToken>,
) -> SearchResult<SearchOutcome> {
    shortest_path(graph, source, target, &ZeroHeuristic, cancel)
}

/// Minimum-cost path from `source` to `target`.
///
/// # Errors
/// - [`SearchError::UnknownNode`] if either endpoint (or an edge head) is out
///   of range.
/// - [`SearchError::NoRouteFound`] if the frontier empties first.
/// - [`SearchError::InvalidWeight`] on a negative or non-finite edge weight.
/// - [`SearchError::Cancelled`] if `cancel` fires.
pub fn shortest_path<G, H>(
    graph: &G,
    source: NodeId,
    target: NodeId,
    heuristic: &H,
    cancel: Option<&CancelToken>,
) -> SearchResult<SearchOutcome>
where
    G: SearchGraph,
    H: Heuristic,
{
    let n = graph.node_count();
    for node in [source, target] {
        if node.index() >= n {
            return Err(SearchError::UnknownNode(node));
        }
    }

    let mut is_settled = vec![false; n];
    // best[v] = lowest cost found so far from source to v.
    let mut best      = vec![f64::INFINITY; n];
    let mut prev_node = vec![NodeId::INVALID; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
    best[source.index()]  = 0.0;
    frontier.push(FrontierEntry { priority: heuristic.estimate(source), node: source });

    let mut settled = 0usize;
    let mut pushed  = 1usize;

    while let Some(FrontierEntry { node, .. }) = frontier.pop() {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(SearchError::Cancelled);
        }

        // Skip stale heap entries.
        if is_settled[node.index()] {
            continue;
        }

        if node == target {
            let path = reconstruct(&prev_node, &prev_edge, source, target, best[target.index()]);
            return Ok(SearchOutcome { path, settled, pushed });
        }

        is_settled[node.index()] = true;
        settled += 1;
        let cost = best[node.index()];

        for Neighbor { node: next, edge, weight } in graph.neighbors(node) {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(SearchError::InvalidWeight { edge, weight });
            }
            let Some(&next_settled) = is_settled.get(next.index()) else {
                return Err(SearchError::UnknownNode(next));
            };
            if next_settled {
                continue;
            }

            let candidate = cost + weight;
            let known = best[next.index()];

            if definitely_less(candidate, known) {
                best[next.index()]      = candidate;
                prev_node[next.index()] = node;
                prev_edge[next.index()] = edge;
                frontier.push(FrontierEntry {
                    priority: candidate + heuristic.estimate(next),
                    node:     next,
                });
                pushed += 1;
            } else if approx_eq(candidate, known) && node < prev_node[next.index()] {
                // Equal cost: prefer the lower predecessor id.  The queue key
                // is unchanged, so no new entry is needed.
                prev_node[next.index()] = node;
                prev_edge[next.index()] = edge;
            }
        }
    }

    Err(SearchError::NoRouteFound { from: source, to: target })
}

fn reconstruct(
    prev_node: &[NodeId],
    prev_edge: &[EdgeId],
    source: NodeId,
    target: NodeId,
    cost: f64,
) -> Path {
    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut cur = target;
    while cur != source {
        edges.push(prev_edge[cur.index()]);
        cur = prev_node[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    edges.reverse();
    Path::new(nodes, edges, cost)
}
