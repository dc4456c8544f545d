//! Nearest-node spatial index.
//!
//! # Metric
//!
//! Node coordinates are projected onto the unit sphere (see
//! [`GeoPoint::to_unit_vector`]) and bulk-loaded into a 3-D R-tree.  Squared
//! chord length orders points exactly as great-circle distance does, so the
//! R-tree's nearest neighbour is the great-circle nearest node at any
//! latitude.  Distances reported to callers are haversine metres.
//!
//! The index copies what it needs out of the graph and holds no reference to
//! it, but it is only meaningful alongside the graph it was built from.

use std::time::Instant;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use wf_core::{GeoPoint, NodeId};

use crate::{RoadGraph, SpatialError, SpatialResult};

/// Relative slack under which two squared chord lengths count as a tie.
const TIE_TOLERANCE: f64 = 1e-12;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct IndexEntry {
    point: [f64; 3],
    pos:   GeoPoint,
    id:    NodeId,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }

    fn contains_point(&self, point: &[f64; 3]) -> bool {
        self.point == *point
    }
}

// ── Snap ──────────────────────────────────────────────────────────────────────

/// A coordinate resolved to a graph node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snap {
    pub node: NodeId,
    /// Great-circle distance from the query coordinate to the node, metres.
    pub distance_m: f64,
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Read-only nearest-node index over every node of a [`RoadGraph`].
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
}

impl SpatialIndex {
    /// Bulk-load the R-tree, O(N log N).
    ///
    /// # Errors
    /// [`SpatialError::EmptyGraph`] if the graph has no nodes.
    pub fn build(graph: &RoadGraph) -> SpatialResult<SpatialIndex> {
        if graph.is_empty() {
            return Err(SpatialError::EmptyGraph);
        }
        let started = Instant::now();

        let entries: Vec<IndexEntry> = graph
            .node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| IndexEntry {
                point: pos.to_unit_vector(),
                pos,
                id: NodeId(i as u32),
            })
            .collect();
        let tree = RTree::bulk_load(entries);

        log::info!("spatial index built: {} nodes in {:.1?}", tree.size(), started.elapsed());
        Ok(SpatialIndex { tree })
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The node nearest to `pos`; equidistant candidates resolve to the
    /// lowest `NodeId`.
    pub fn nearest(&self, pos: GeoPoint) -> SpatialResult<NodeId> {
        self.nearest_with_distance(pos).map(|s| s.node)
    }

    /// Like [`nearest`](Self::nearest), also reporting the snap distance.
    ///
    /// # Errors
    /// - [`SpatialError::InvalidCoordinate`] for a NaN or out-of-range `pos`.
    /// - [`SpatialError::NoNodesAvailable`] if the index is empty.
    pub fn nearest_with_distance(&self, pos: GeoPoint) -> SpatialResult<Snap> {
        if !pos.is_valid() {
            return Err(SpatialError::InvalidCoordinate { lat: pos.lat, lon: pos.lon });
        }
        let query = pos.to_unit_vector();
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&query);

        let (first, best_d2) = candidates.next().ok_or(SpatialError::NoNodesAvailable)?;
        let limit = best_d2 + best_d2 * TIE_TOLERANCE + f64::MIN_POSITIVE;

        let mut winner = first;
        for (entry, d2) in candidates {
            if d2 > limit {
                break;
            }
            if entry.id < winner.id {
                winner = entry;
            }
        }

        Ok(Snap { node: winner.id, distance_m: pos.distance_m(winner.pos) })
    }

    /// Up to `k` nearest nodes, by ascending distance then ascending id.
    /// Empty for an invalid `pos`.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<Snap> {
        if k == 0 || !pos.is_valid() {
            return Vec::new();
        }
        let query = pos.to_unit_vector();

        // Pull the k nearest plus anything tied with the k-th so the id
        // tie-break is applied across the whole tie group.
        let mut found: Vec<(&IndexEntry, f64)> = Vec::with_capacity(k + 1);
        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            if found.len() >= k {
                let kth = found[k - 1].1;
                if d2 > kth + kth * TIE_TOLERANCE + f64::MIN_POSITIVE {
                    break;
                }
            }
            found.push((entry, d2));
        }

        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.id.cmp(&b.0.id)));
        found.truncate(k);
        found
            .into_iter()
            .map(|(e, _)| Snap { node: e.id, distance_m: pos.distance_m(e.pos) })
            .collect()
    }
}
