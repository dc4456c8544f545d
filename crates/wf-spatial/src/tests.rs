//! Unit tests for wf-spatial.
//!
//! All tests use hand-crafted networks so they run without any map extract.

#[cfg(test)]
pub(crate) mod helpers {
    use wf_core::GeoPoint;
    use crate::{RoadGraph, RoadGraphBuilder};

    /// Build a small grid network for testing.
    ///
    /// External ids and positions (lat, lon):
    ///   10:(0,0)  11:(0,1)  12:(0,2)
    ///   13:(1,0)            14:(1,2)
    ///
    /// Undirected roads: 10-11, 11-12, 10-13, 12-14, 13-14
    pub fn grid_graph() -> RoadGraph {
        let mut b = RoadGraphBuilder::new();
        b.add_node(10, GeoPoint::new(0.0, 0.0));
        b.add_node(11, GeoPoint::new(0.0, 1.0));
        b.add_node(12, GeoPoint::new(0.0, 2.0));
        b.add_node(13, GeoPoint::new(1.0, 0.0));
        b.add_node(14, GeoPoint::new(1.0, 2.0));

        b.add_road(10, 11, 100.0, 10.0);
        b.add_road(11, 12, 100.0, 10.0);
        b.add_road(12, 14, 100.0, 10.0);
        b.add_road(10, 13, 500.0, 10.0);
        b.add_road(13, 14, 100.0, 10.0);
        b.build().unwrap()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use wf_core::{GeoPoint, NodeId, Weighting};
    use crate::{EdgeSpec, GraphConfig, NodeSpec, RoadGraph, RoadGraphBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let g = RoadGraphBuilder::new().build().unwrap();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn single_road_is_bidirectional() {
        let mut b = RoadGraphBuilder::new();
        b.add_node(1, GeoPoint::new(30.0, -88.0));
        b.add_node(2, GeoPoint::new(30.01, -88.0));
        b.add_road(1, 2, 1_200.0, 12.0);
        let g = b.build().unwrap();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn dense_ids_follow_external_order() {
        let mut b = RoadGraphBuilder::new();
        b.add_node(900, GeoPoint::new(0.0, 0.0));
        b.add_node(5, GeoPoint::new(0.0, 1.0));
        b.add_node(42, GeoPoint::new(0.0, 2.0));
        let g = b.build().unwrap();
        assert_eq!(g.resolve(5).unwrap(), NodeId(0));
        assert_eq!(g.resolve(42).unwrap(), NodeId(1));
        assert_eq!(g.resolve(900).unwrap(), NodeId(2));
        assert_eq!(g.external_id(NodeId(1)).unwrap(), 42);
        assert_eq!(g.position(NodeId(2)).unwrap(), GeoPoint::new(0.0, 0.0));
    }

    #[test]
    fn unknown_lookups() {
        let g = super::helpers::grid_graph();
        assert!(matches!(g.resolve(99), Err(SpatialError::UnknownExternalId(99))));
        assert!(matches!(g.external_id(NodeId(5)), Err(SpatialError::UnknownNode(_))));
        assert!(matches!(g.position(NodeId::INVALID), Err(SpatialError::UnknownNode(_))));
    }

    #[test]
    fn edge_to_missing_node_is_invalid() {
        let nodes = [NodeSpec { id: 1, lat: 0.0, lon: 0.0 }];
        let edges = [EdgeSpec::directed(1, 2, 100.0, 10.0)];
        let err = RoadGraph::build(nodes, edges, GraphConfig::default()).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidGraph(ref m) if m.contains("unknown node 2")), "{err}");
    }

    #[test]
    fn non_positive_attributes_are_invalid() {
        let nodes = || [NodeSpec { id: 1, lat: 0.0, lon: 0.0 }, NodeSpec { id: 2, lat: 0.0, lon: 0.001 }];
        let cases = [
            EdgeSpec::directed(1, 2, 0.0, 10.0),
            EdgeSpec::directed(1, 2, -5.0, 10.0),
            EdgeSpec::directed(1, 2, 100.0, 0.0),
            EdgeSpec::directed(1, 2, 100.0, -1.0),
            EdgeSpec::directed(1, 2, f64::NAN, 10.0),
            EdgeSpec { travel_time_s: Some(0.0), ..EdgeSpec::directed(1, 2, 100.0, 10.0) },
        ];
        for edge in cases {
            let res = RoadGraph::build(nodes(), [edge.clone()], GraphConfig::default());
            assert!(matches!(res, Err(SpatialError::InvalidGraph(_))), "{edge:?} accepted");
        }
    }

    #[test]
    fn duplicate_and_out_of_range_nodes_are_invalid() {
        let dup = [NodeSpec { id: 1, lat: 0.0, lon: 0.0 }, NodeSpec { id: 1, lat: 1.0, lon: 1.0 }];
        assert!(matches!(
            RoadGraph::build(dup, Vec::<EdgeSpec>::new(), GraphConfig::default()),
            Err(SpatialError::InvalidGraph(_))
        ));
        let bad = [NodeSpec { id: 1, lat: 91.0, lon: 0.0 }];
        assert!(matches!(
            RoadGraph::build(bad, Vec::<EdgeSpec>::new(), GraphConfig::default()),
            Err(SpatialError::InvalidGraph(_))
        ));
    }

    #[test]
    fn bad_default_speed_is_invalid() {
        let config = GraphConfig { default_speed_mps: 0.0, ..GraphConfig::default() };
        assert!(matches!(
            RoadGraphBuilder::with_config(config).build(),
            Err(SpatialError::InvalidGraph(_))
        ));
    }

    #[test]
    fn travel_time_derivation() {
        let nodes = [NodeSpec { id: 1, lat: 0.0, lon: 0.0 }, NodeSpec { id: 2, lat: 0.0, lon: 0.001 }];
        let edges = [
            EdgeSpec::directed(1, 2, 100.0, 20.0), // speed → 5 s
            EdgeSpec { travel_time_s: Some(42.0), speed_mps: None, ..EdgeSpec::directed(2, 1, 100.0, 1.0) },
            EdgeSpec { speed_mps: None, ..EdgeSpec::directed(1, 1, 13.89, 1.0) }, // default speed → 1 s
        ];
        let g = RoadGraph::build(nodes, edges, GraphConfig::default()).unwrap();
        // Sorted by (from, to): 1→1, 1→2, 2→1
        assert!((g.edge_travel_s[0] - 1.0).abs() < 1e-9);
        assert!((g.edge_travel_s[1] - 5.0).abs() < 1e-9);
        assert_eq!(g.edge_travel_s[2], 42.0);
        assert!((g.max_speed_mps() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn max_speed_is_the_supplied_speed() {
        // length / (length / 22.22) rounds one ulp above 22.22.
        let nodes = [NodeSpec { id: 1, lat: 0.0, lon: 0.0 }, NodeSpec { id: 2, lat: 0.02, lon: 0.0 }];
        let edges = [EdgeSpec::road(1, 2, 3135.255061694904, 22.22)];
        let g = RoadGraph::build(nodes, edges, GraphConfig::default()).unwrap();
        assert_eq!(g.max_speed_mps(), 22.22);
    }

    #[test]
    fn neighbors_use_configured_weighting() {
        let nodes = [NodeSpec { id: 1, lat: 0.0, lon: 0.0 }, NodeSpec { id: 2, lat: 0.0, lon: 0.001 }];
        let edges = [EdgeSpec::directed(1, 2, 120.0, 12.0)];

        let by_dist = RoadGraph::build(nodes, edges.clone(), GraphConfig::default()).unwrap();
        let n: Vec<_> = by_dist.neighbors(NodeId(0)).unwrap().collect();
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].node, NodeId(1));
        assert_eq!(n[0].weight, 120.0);

        let config = GraphConfig { weighting: Weighting::Time, ..GraphConfig::default() };
        let by_time = RoadGraph::build(nodes, edges, config).unwrap();
        let n: Vec<_> = by_time.neighbors(NodeId(0)).unwrap().collect();
        assert!((n[0].weight - 10.0).abs() < 1e-12);
    }

    #[test]
    fn neighbors_of_sink_and_unknown() {
        let mut b = RoadGraphBuilder::new();
        b.add_node(1, GeoPoint::new(0.0, 0.0));
        b.add_node(2, GeoPoint::new(0.0, 0.001));
        b.add_directed_edge(1, 2, 100.0, 10.0);
        let g = b.build().unwrap();
        assert_eq!(g.neighbors(NodeId(1)).unwrap().count(), 0);
        assert!(matches!(g.neighbors(NodeId(2)), Err(SpatialError::UnknownNode(NodeId(2)))));
        assert_eq!(g.out_degree(NodeId(0)).unwrap(), 1);
    }

    #[test]
    fn neighbor_order_is_deterministic() {
        let g = super::helpers::grid_graph();
        let n10 = g.resolve(10).unwrap();
        let first: Vec<_> = g.neighbors(n10).unwrap().collect();
        let second: Vec<_> = g.neighbors(n10).unwrap().collect();
        assert_eq!(first, second);
        // Sorted by destination id.
        assert!(first.windows(2).all(|w| w[0].node <= w[1].node));
    }

    #[test]
    fn csr_edges_originate_at_node() {
        let g = super::helpers::grid_graph();
        for i in 0..g.node_count() {
            let n = NodeId(i as u32);
            for e in g.out_edges(n) {
                assert_eq!(g.edge(e).unwrap().from, n);
            }
        }
    }

    #[test]
    fn length_ratio_flags_short_edges() {
        // Grid roads are ~100 m between nodes a degree (~111 km) apart.
        let g = super::helpers::grid_graph();
        assert!(g.min_length_ratio() < 0.01);

        let mut b = RoadGraphBuilder::new();
        let a = GeoPoint::new(0.0, 0.0);
        let c = GeoPoint::new(0.0, 0.01);
        b.add_node(1, a);
        b.add_node(2, c);
        b.add_road(1, 2, a.distance_m(c) * 1.2, 10.0);
        let g = b.build().unwrap();
        assert!((g.min_length_ratio() - 1.2).abs() < 1e-9);
    }
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use wf_core::{GeoPoint, NodeId};
    use crate::{RoadGraphBuilder, SpatialError, SpatialIndex};

    #[test]
    fn empty_graph_rejected() {
        let g = RoadGraphBuilder::new().build().unwrap();
        assert!(matches!(SpatialIndex::build(&g), Err(SpatialError::EmptyGraph)));
    }

    #[test]
    fn exact_position_has_zero_distance() {
        let g = super::helpers::grid_graph();
        let idx = SpatialIndex::build(&g).unwrap();
        let snap = idx.nearest_with_distance(GeoPoint::new(0.0, 1.0)).unwrap();
        assert_eq!(snap.node, g.resolve(11).unwrap());
        assert_eq!(snap.distance_m, 0.0);
    }

    #[test]
    fn nearest_between_nodes() {
        let g = super::helpers::grid_graph();
        let idx = SpatialIndex::build(&g).unwrap();
        assert_eq!(idx.nearest(GeoPoint::new(0.0, 0.4)).unwrap(), g.resolve(10).unwrap());
        assert_eq!(idx.nearest(GeoPoint::new(0.0, 0.6)).unwrap(), g.resolve(11).unwrap());
    }

    #[test]
    fn tie_goes_to_lowest_id() {
        let mut b = RoadGraphBuilder::new();
        b.add_node(7, GeoPoint::new(0.0, 1.0));
        b.add_node(3, GeoPoint::new(0.0, -1.0));
        let g = b.build().unwrap();
        let idx = SpatialIndex::build(&g).unwrap();
        // Equator midpoint is exactly equidistant.
        assert_eq!(idx.nearest(GeoPoint::new(0.0, 0.0)).unwrap(), NodeId(0));
        assert_eq!(g.external_id(NodeId(0)).unwrap(), 3);
    }

    #[test]
    fn coincident_nodes_resolve_to_lowest_id() {
        let mut b = RoadGraphBuilder::new();
        for id in [50, 20, 30] {
            b.add_node(id, GeoPoint::new(45.0, 7.0));
        }
        let g = b.build().unwrap();
        let idx = SpatialIndex::build(&g).unwrap();
        let n = idx.nearest(GeoPoint::new(45.0, 7.0)).unwrap();
        assert_eq!(g.external_id(n).unwrap(), 20);
    }

    #[test]
    fn great_circle_not_raw_degrees() {
        // At 60°N a degree of longitude is half a degree of latitude, so the
        // east node (1.5° lon away) is nearer than the north node (1° lat).
        let mut b = RoadGraphBuilder::new();
        b.add_node(1, GeoPoint::new(61.0, 0.0));
        b.add_node(2, GeoPoint::new(60.0, 1.5));
        let g = b.build().unwrap();
        let idx = SpatialIndex::build(&g).unwrap();
        let n = idx.nearest(GeoPoint::new(60.0, 0.0)).unwrap();
        assert_eq!(g.external_id(n).unwrap(), 2);
    }

    #[test]
    fn invalid_query_coordinate_is_an_error() {
        let g = super::helpers::grid_graph();
        let idx = SpatialIndex::build(&g).unwrap();
        for bad in [GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(0.0, f64::INFINITY), GeoPoint::new(95.0, 0.0)] {
            assert!(matches!(
                idx.nearest_with_distance(bad),
                Err(SpatialError::InvalidCoordinate { .. })
            ));
            assert!(matches!(idx.nearest(bad), Err(SpatialError::InvalidCoordinate { .. })));
            assert!(idx.k_nearest(bad, 3).is_empty());
        }
    }

    #[test]
    fn k_nearest_order() {
        let g = super::helpers::grid_graph();
        let idx = SpatialIndex::build(&g).unwrap();
        let near = idx.k_nearest(GeoPoint::new(0.0, 0.0), 3);
        assert_eq!(near.len(), 3);
        assert_eq!(near[0].node, g.resolve(10).unwrap());
        assert!(near.windows(2).all(|w| w[0].distance_m <= w[1].distance_m));
        assert!(idx.k_nearest(GeoPoint::new(0.0, 0.0), 0).is_empty());
        assert_eq!(idx.k_nearest(GeoPoint::new(0.0, 0.0), 50).len(), 5);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use wf_core::Weighting;
    use crate::{load_edges_reader, load_graph_csv, load_nodes_reader, GraphConfig, SpatialError};

    const NODES: &str = "\
id,lat,lon\n\
101,12.9716,77.5946\n\
102,12.9721,77.5960\n\
103,12.9730,77.5975\n\
";

    const EDGES: &str = "\
from,to,length_m,speed_mps,travel_time_s,bidirectional\n\
101,102,165.0,13.9,,true\n\
102,103,190.0,,19.0,false\n\
";

    #[test]
    fn parses_nodes() {
        let nodes = load_nodes_reader(Cursor::new(NODES)).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].id, 102);
        assert_eq!(nodes[1].lat, 12.9721);
    }

    #[test]
    fn parses_optional_edge_columns() {
        let edges = load_edges_reader(Cursor::new(EDGES)).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].speed_mps, Some(13.9));
        assert_eq!(edges[0].travel_time_s, None);
        assert!(edges[0].bidirectional);
        assert_eq!(edges[1].speed_mps, None);
        assert_eq!(edges[1].travel_time_s, Some(19.0));
    }

    #[test]
    fn minimal_edge_columns() {
        let csv = "from,to,length_m\n1,2,50\n";
        let edges = load_edges_reader(Cursor::new(csv)).unwrap();
        assert_eq!(edges[0].length_m, 50.0);
        assert_eq!(edges[0].speed_mps, None);
        assert!(!edges[0].bidirectional);
    }

    #[test]
    fn parse_error_reports_row() {
        let csv = "id,lat,lon\n1,0.0,0.0\n2,north,0.0\n";
        let err = load_nodes_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(ref m) if m.contains("row 3")), "{err}");
    }

    #[test]
    fn loads_graph_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let nodes_path = dir.path().join("nodes.csv");
        let edges_path = dir.path().join("edges.csv");
        std::fs::File::create(&nodes_path).unwrap().write_all(NODES.as_bytes()).unwrap();
        std::fs::File::create(&edges_path).unwrap().write_all(EDGES.as_bytes()).unwrap();

        let config = GraphConfig { weighting: Weighting::Time, ..GraphConfig::default() };
        let g = load_graph_csv(&nodes_path, &edges_path, config).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.config().weighting, Weighting::Time);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let err = load_graph_csv(&missing, &missing, GraphConfig::default()).unwrap_err();
        assert!(matches!(err, SpatialError::Io(_)));
    }
}
