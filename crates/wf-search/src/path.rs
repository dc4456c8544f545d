//! Search output.

use wf_core::{EdgeId, NodeId};

/// An ordered walk from source to destination.
///
/// `edges[i]` joins `nodes[i]` to `nodes[i + 1]`; `cost` is the total weight
/// under the weighting the search optimised.  Never mutated after return.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    cost:  f64,
}

impl Path {
    /// Assemble a path from parts.  Consistency with a graph is checked by
    /// [`RouteMetrics::compute`](crate::RouteMetrics::compute).
    pub fn new(nodes: Vec<NodeId>, edges: Vec<EdgeId>, cost: f64) -> Self {
        Self { nodes, edges, cost }
    }

    /// The zero-cost path that starts and ends at `node`.
    pub fn single(node: NodeId) -> Self {
        Self { nodes: vec![node], edges: Vec::new(), cost: 0.0 }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}
