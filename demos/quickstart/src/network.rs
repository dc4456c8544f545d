//! Built-in sample network used when no CSV files are given.
//!
//! Eight junctions in central Bengaluru joined by arterial roads and a faster
//! ring road.  Road lengths are the straight-line distance stretched by a
//! per-road detour factor, so the network is valid for A*.

use wf_core::GeoPoint;
use wf_spatial::{EdgeSpec, NodeSpec};

const JUNCTIONS: [(u64, f64, f64); 8] = [
    (1, 12.9716, 77.5946), // MG Road
    (2, 12.9784, 77.6408), // Indiranagar
    (3, 12.9352, 77.6245), // Koramangala
    (4, 12.9279, 77.5802), // Jayanagar
    (5, 12.9915, 77.5545), // Rajajinagar
    (6, 13.0068, 77.5813), // Sadashivanagar
    (7, 12.9569, 77.7011), // Marathahalli
    (8, 12.9166, 77.6101), // BTM Layout
];

// (a, b, detour factor, speed m/s)
const ROADS: [(u64, u64, f64, f64); 13] = [
    (1, 2, 1.25, 8.3),
    (1, 3, 1.30, 8.3),
    (1, 4, 1.20, 9.7),
    (1, 5, 1.35, 8.3),
    (1, 6, 1.15, 11.1),
    (2, 3, 1.20, 9.7),
    (2, 7, 1.10, 13.9),
    (3, 8, 1.15, 9.7),
    (4, 8, 1.25, 8.3),
    (5, 6, 1.20, 11.1),
    // Outer ring: longer but fast.
    (6, 7, 1.45, 19.4),
    (7, 8, 1.30, 19.4),
    (8, 5, 1.50, 19.4),
];

fn position(id: u64) -> GeoPoint {
    JUNCTIONS
        .iter()
        .find(|j| j.0 == id)
        .map(|&(_, lat, lon)| GeoPoint::new(lat, lon))
        .unwrap_or(GeoPoint::new(0.0, 0.0))
}

pub fn sample_network() -> (Vec<NodeSpec>, Vec<EdgeSpec>) {
    let nodes = JUNCTIONS
        .iter()
        .map(|&(id, lat, lon)| NodeSpec::new(id, GeoPoint::new(lat, lon)))
        .collect();

    let edges = ROADS
        .iter()
        .map(|&(a, b, detour, speed)| {
            let length = position(a).distance_m(position(b)) * detour;
            EdgeSpec::road(a, b, length, speed)
        })
        .collect();

    (nodes, edges)
}

/// MG Road to Marathahalli.
pub const SAMPLE_START: &str = "12.9716,77.5946";
pub const SAMPLE_END: &str = "12.9569,77.7011";
