//! Unit tests for rr-spatial.
//!
//! All tests use hand-crafted graphs so they run without provider data.

#[cfg(test)]
mod helpers {
    use rr_core::{GeoPoint, NodeId};
    use crate::{WalkGraph, WalkGraphBuilder};

    /// Build a small grid graph for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Two-way footways: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Shortest path 0→4 by length:
    ///   0→1→2→4 = 300 m  vs  0→3→4 = 600 m
    pub fn grid_graph() -> (WalkGraph, [NodeId; 5]) {
        let mut b = WalkGraphBuilder::new();

        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        b.add_footway(n0, n1, 100.0);
        b.add_footway(n1, n2, 100.0);
        b.add_footway(n2, n4, 100.0);
        b.add_footway(n0, n3, 500.0); // long detour
        b.add_footway(n3, n4, 100.0);

        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }

    /// A→B (100), B→C (100), A→C (300), all one-way.
    pub fn triangle() -> (WalkGraph, [NodeId; 3]) {
        let mut b = WalkGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(35.830, 128.750));
        let bb = b.add_node(GeoPoint::new(35.831, 128.750));
        let c = b.add_node(GeoPoint::new(35.832, 128.750));
        b.add_edge(a, bb, 100.0);
        b.add_edge(bb, c, 100.0);
        b.add_edge(a, c, 300.0);
        (b.build().unwrap(), [a, bb, c])
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use rr_core::{EdgeId, GeoPoint};
    use crate::{SpatialError, WalkGraphBuilder};

    #[test]
    fn empty_build() {
        let graph = WalkGraphBuilder::new().build().unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn single_footway() {
        let mut b = WalkGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(35.0, 128.0));
        let c = b.add_node(GeoPoint::new(35.1, 128.0));
        b.add_footway(a, c, 1_000.0);
        let graph = b.build().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn csr_out_edges() {
        let (graph, [n0, n1, n2, n3, n4]) = super::helpers::grid_graph();

        assert_eq!(graph.out_edges(n1).count(), 2);
        assert_eq!(graph.out_degree(n0), 2);
        assert_eq!(graph.out_degree(n2), 2);
        assert_eq!(graph.out_degree(n3), 2);
        assert_eq!(graph.out_degree(n4), 2);

        for e in graph.out_edges(n0) {
            assert_eq!(graph.edge_from[e.index()], n0);
        }
        let mut neighbors: Vec<_> = graph.neighbors(n0).collect();
        neighbors.sort();
        assert_eq!(neighbors, vec![n1, n3]);
    }

    #[test]
    fn parallel_edges_get_keys() {
        let mut b = WalkGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        assert_eq!(b.add_edge(a, c, 120.0), 0);
        assert_eq!(b.add_edge(a, c, 80.0), 1);
        assert_eq!(b.add_edge(c, a, 80.0), 0);
        let graph = b.build().unwrap();

        assert_eq!(graph.edges_between(a, c).count(), 2);
        let k1 = graph.edge(a, c, 1).unwrap();
        assert_eq!(graph.edge_length_m[k1.index()], 80.0);
        assert_eq!(graph.shortest_edge_between(a, c), Some(k1));
        assert_eq!(graph.edge(a, c, 2), None);
    }

    #[test]
    fn path_length_uses_shortest_parallel_edge() {
        let mut b = WalkGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        let d = b.add_node(GeoPoint::new(0.0, 2.0));
        b.add_edge(a, c, 120.0);
        b.add_edge(a, c, 80.0);
        b.add_edge(c, d, 50.0);
        let graph = b.build().unwrap();

        assert_eq!(graph.path_length(&[a, c, d]), Some(130.0));
        assert_eq!(graph.path_length(&[a]), Some(0.0));
        assert_eq!(graph.path_length(&[d, a]), None);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut b = WalkGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_weighted_edge(a, c, 100.0, -1.0);
        assert!(matches!(b.build(), Err(SpatialError::NegativeWeight { .. })));
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let mut b = WalkGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        b.add_edge(a, rr_core::NodeId(9), 10.0);
        assert!(matches!(b.build(), Err(SpatialError::NodeNotFound(_))));
    }

    #[test]
    fn set_edge_weight_validates() {
        let (mut graph, _) = super::helpers::grid_graph();
        assert!(graph.set_edge_weight(EdgeId(0), 42.0).is_ok());
        assert_eq!(graph.edge_weight[0], 42.0);
        assert!(graph.set_edge_weight(EdgeId(0), f64::NAN).is_err());
        assert!(graph.set_edge_weight(EdgeId(0), -3.0).is_err());
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use rr_core::GeoPoint;
    use crate::{WalkGraph, WalkGraphBuilder};

    #[test]
    fn snap_exact_position() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        assert_eq!(graph.nearest_node(GeoPoint::new(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn snap_nearest() {
        let (graph, [n0, n1, ..]) = super::helpers::grid_graph();
        assert_eq!(graph.nearest_node(GeoPoint::new(0.0, 0.4)), Some(n0));
        assert_eq!(graph.nearest_node(GeoPoint::new(0.0, 0.6)), Some(n1));
    }

    #[test]
    fn tie_goes_to_lowest_id() {
        let mut b = WalkGraphBuilder::new();
        let west = b.add_node(GeoPoint::new(0.0, -0.001));
        let _east = b.add_node(GeoPoint::new(0.0, 0.001));
        let graph = b.build().unwrap();
        assert_eq!(graph.nearest_node(GeoPoint::new(0.0, 0.0)), Some(west));
    }

    #[test]
    fn duplicate_positions_resolve_to_lowest_id() {
        let mut b = WalkGraphBuilder::new();
        for _ in 0..5 {
            b.add_node(GeoPoint::new(35.0, 128.0));
        }
        let graph = b.build().unwrap();
        assert_eq!(graph.nearest_node(GeoPoint::new(35.0, 128.0)), Some(rr_core::NodeId(0)));
    }

    #[test]
    fn great_circle_not_planar() {
        // At 60°N a degree of longitude is half a degree of latitude on the
        // ground: the eastern node is closer even though its lon offset is
        // numerically larger.
        let mut b = WalkGraphBuilder::new();
        let north = b.add_node(GeoPoint::new(60.0015, 0.0));
        let east = b.add_node(GeoPoint::new(60.0, 0.0025));
        let graph = b.build().unwrap();
        let _ = north;
        assert_eq!(graph.nearest_node(GeoPoint::new(60.0, 0.0)), Some(east));
    }

    #[test]
    fn within_radius() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        assert_eq!(graph.nearest_node_within(GeoPoint::new(0.0, 0.0001), 50.0), Some(n0));
        assert_eq!(graph.nearest_node_within(GeoPoint::new(0.0, 0.1), 50.0), None);
    }

    #[test]
    fn empty_graph_returns_none() {
        let graph = WalkGraph::empty();
        assert!(graph.nearest_node(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn k_nearest_order() {
        let (graph, nodes) = super::helpers::grid_graph();
        let nearest = graph.k_nearest_nodes(GeoPoint::new(0.0, 0.0), 2);
        assert_eq!(nearest[0], nodes[0]);
        // n1 (1° east) and n3 (1° north) are nearly equidistant.
        assert!(nearest[1] == nodes[1] || nearest[1] == nodes[3]);
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use rr_core::{GeoPoint, NodeId};
    use crate::{DijkstraRouter, Router, SpatialError, WalkGraphBuilder, WeightKey};

    #[test]
    fn trivial_same_node() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        let p = DijkstraRouter.shortest_path(&graph, n0, n0, WeightKey::Length).unwrap();
        assert!(p.edges.is_empty());
        assert_eq!(p.nodes, vec![n0]);
        assert_eq!(p.length_m, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (graph, [n0, n1, n2, _, n4]) = super::helpers::grid_graph();
        let p = DijkstraRouter.shortest_path(&graph, n0, n4, WeightKey::Length).unwrap();
        assert_eq!(p.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(p.edges.len(), 3);
        assert_eq!(p.length_m, 300.0);
        assert_eq!(p.cost, 300.0);
    }

    #[test]
    fn two_hops_beat_direct_edge() {
        let (graph, [a, b, c]) = super::helpers::triangle();
        let p = DijkstraRouter.shortest_path(&graph, a, c, WeightKey::Length).unwrap();
        assert_eq!(p.nodes, vec![a, b, c]);
        assert_eq!(p.length_m, 200.0);
    }

    #[test]
    fn weight_key_changes_the_route() {
        let (mut graph, [a, b, c]) = super::helpers::triangle();
        let ab = graph.edge(a, b, 0).unwrap();
        graph.set_edge_weight(ab, 1_000.0).unwrap();

        let by_weight = DijkstraRouter.shortest_path(&graph, a, c, WeightKey::Weight).unwrap();
        assert_eq!(by_weight.nodes, vec![a, c]);
        assert_eq!(by_weight.length_m, 300.0);

        let by_length = DijkstraRouter.shortest_path(&graph, a, c, WeightKey::Length).unwrap();
        assert_eq!(by_length.nodes, vec![a, b, c]);
    }

    #[test]
    fn cheapest_parallel_edge_is_pinned() {
        let mut b = WalkGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_edge(a, c, 120.0);
        b.add_edge(a, c, 80.0);
        let graph = b.build().unwrap();

        let p = DijkstraRouter.shortest_path(&graph, a, c, WeightKey::Length).unwrap();
        assert_eq!(p.edges, vec![graph.edge(a, c, 1).unwrap()]);
        assert_eq!(p.length_m, 80.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = WalkGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let graph = b.build().unwrap();
        let result = DijkstraRouter.shortest_path(&graph, a, c, WeightKey::Length);
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn one_way_blocks_return() {
        let (graph, [a, _, c]) = super::helpers::triangle();
        assert!(DijkstraRouter.shortest_path(&graph, a, c, WeightKey::Length).is_ok());
        assert!(DijkstraRouter.shortest_path(&graph, c, a, WeightKey::Length).is_err());
    }

    #[test]
    fn unknown_node_errors() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        let result = DijkstraRouter.shortest_path(&graph, n0, NodeId(99), WeightKey::Length);
        assert!(matches!(result, Err(SpatialError::NodeNotFound(NodeId(99)))));
    }

    #[test]
    fn route_through_concatenates_without_duplicates() {
        let (graph, [n0, n1, n2, n3, n4]) = super::helpers::grid_graph();
        let p = DijkstraRouter
            .route_through(&graph, &[n0, n3, n4, n2], WeightKey::Length)
            .unwrap();
        // 0 → 3 goes round through 1, 2, 4 (400 m) rather than the 500 m edge.
        assert_eq!(p.nodes, vec![n0, n1, n2, n4, n3, n4, n2]);
        assert_eq!(p.edges.len(), p.nodes.len() - 1);
        assert_eq!(p.length_m, 600.0);
        assert_eq!(graph.edges_length(&p.edges), p.length_m);
    }

    #[test]
    fn route_through_repeated_point_adds_nothing() {
        let (graph, [n0, _, _, _, n4]) = super::helpers::grid_graph();
        let direct = DijkstraRouter.route_through(&graph, &[n0, n4], WeightKey::Length).unwrap();
        let repeated = DijkstraRouter
            .route_through(&graph, &[n0, n4, n4], WeightKey::Length)
            .unwrap();
        assert_eq!(direct, repeated);
    }

    #[test]
    fn route_through_fails_as_a_whole() {
        let (graph, [a, b, c]) = super::helpers::triangle();
        // c → b has no path, so nothing is returned even though a → c works.
        let result = DijkstraRouter.route_through(&graph, &[a, c, b], WeightKey::Length);
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn route_through_edge_cases() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        let empty = DijkstraRouter.route_through(&graph, &[], WeightKey::Length).unwrap();
        assert!(empty.nodes.is_empty());
        let single = DijkstraRouter.route_through(&graph, &[n0], WeightKey::Length).unwrap();
        assert_eq!(single.nodes, vec![n0]);
    }
}

// ── Preference weights ────────────────────────────────────────────────────────

#[cfg(test)]
mod preferences {
    use rr_core::{Avoid, GeoPoint, NodeId, NodeTag, Place, Preferences};
    use crate::{DijkstraRouter, Router, WalkGraph, WalkGraphBuilder, WeightKey};

    /// S ─100─ A ─100─ E  and  S ─120─ P ─120─ E, all two-way.
    /// `P` is in a park, `A` is by the river.
    fn two_ways() -> (WalkGraph, [NodeId; 4]) {
        let mut b = WalkGraphBuilder::new();
        let s = b.add_node(GeoPoint::new(35.830, 128.750));
        let a = b.add_node(GeoPoint::new(35.831, 128.751));
        let p = b.add_node(GeoPoint::new(35.829, 128.751));
        let e = b.add_node(GeoPoint::new(35.830, 128.752));
        b.set_node_tag(p, NodeTag::Park);
        b.set_node_tag(a, NodeTag::River);
        b.add_footway(s, a, 100.0);
        b.add_footway(a, e, 100.0);
        b.add_footway(s, p, 120.0);
        b.add_footway(p, e, 120.0);
        (b.build().unwrap(), [s, a, p, e])
    }

    #[test]
    fn tags_survive_build() {
        let (graph, [s, a, p, _]) = two_ways();
        assert_eq!(graph.node_tag[s.index()], NodeTag::Normal);
        assert_eq!(graph.node_tag[a.index()], NodeTag::River);
        assert_eq!(graph.node_tag[p.index()], NodeTag::Park);
    }

    #[test]
    fn unknown_node_tag_is_ignored() {
        let mut b = WalkGraphBuilder::new();
        b.add_node(GeoPoint::new(0.0, 0.0));
        b.set_node_tag(NodeId(5), NodeTag::Park);
        assert_eq!(b.build().unwrap().node_tag, vec![NodeTag::Normal]);
    }

    #[test]
    fn neutral_preferences_keep_lengths() {
        let (mut graph, _) = two_ways();
        assert_eq!(graph.apply_preferences(&Preferences::new()), 0);
        assert_eq!(graph.edge_weight, graph.edge_length_m);
    }

    #[test]
    fn park_preference_pulls_the_route_through_the_park() {
        let (mut graph, [s, a, p, e]) = two_ways();
        let plain = DijkstraRouter.shortest_path(&graph, s, e, WeightKey::Weight).unwrap();
        assert_eq!(plain.nodes, vec![s, a, e]);

        // Four directed edges touch P.
        let changed = graph.apply_preferences(&Preferences::new().with_place(Place::Park));
        assert_eq!(changed, 4);
        let park = DijkstraRouter.shortest_path(&graph, s, e, WeightKey::Weight).unwrap();
        assert_eq!(park.nodes, vec![s, p, e]);
        assert!((park.cost - 168.0).abs() < 1e-9);
        assert_eq!(park.length_m, 240.0);

        // Length routing is unaffected.
        let by_length = DijkstraRouter.shortest_path(&graph, s, e, WeightKey::Length).unwrap();
        assert_eq!(by_length.nodes, vec![s, a, e]);
    }

    #[test]
    fn avoiding_dark_leaves_the_river() {
        let (mut graph, [s, _, p, e]) = two_ways();
        graph.apply_preferences(&Preferences::new().with_avoid(Avoid::Dark));
        let path = DijkstraRouter.shortest_path(&graph, s, e, WeightKey::Weight).unwrap();
        assert_eq!(path.nodes, vec![s, p, e]);
    }

    #[test]
    fn reapplying_starts_from_length() {
        let (mut graph, _) = two_ways();
        let parks = Preferences::new().with_place(Place::Park);
        graph.apply_preferences(&parks);
        let once = graph.edge_weight.clone();
        graph.apply_preferences(&parks);
        assert_eq!(graph.edge_weight, once);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use rr_core::{GeoPoint, NodeTag};
    use crate::{DijkstraRouter, GraphArea, Router, SpatialError, WeightKey, load_graph_csv, load_graph_readers};

    const NODES: &str = "id,lat,lon\n\
                         10,35.8300,128.7500\n\
                         11,35.8310,128.7500\n\
                         12,35.8320,128.7500\n\
                         99,35.9000,128.9000\n";

    #[test]
    fn loads_keys_lengths_and_weights() {
        let edges = "from,to,length,weight\n\
                     10,11,110.0,\n\
                     11,12,,5.0\n\
                     12,99,1.0,1.0\n";
        let graph = load_graph_readers(Cursor::new(NODES), Cursor::new(edges), None).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.node_key, vec![10, 11, 12, 99]);
        assert_eq!(graph.edge_count(), 3);

        // Blank weight → length.
        assert_eq!(graph.edge_weight[0], 110.0);
        // Blank length → haversine (~111 m for 0.001° latitude).
        let fallback = graph.edge_length_m[1];
        assert!((fallback - 111.2).abs() < 1.0, "got {fallback}");
        assert_eq!(graph.edge_weight[1], 5.0);
    }

    #[test]
    fn tag_column_classifies_nodes() {
        let nodes = "id,lat,lon,tag\n\
                     1,35.830,128.75,Duryu Park\n\
                     2,35.831,128.75,\n\
                     3,35.832,128.75,Geumho river walk\n";
        let edges = "from,to,length\n1,2,100\n";
        let graph = load_graph_readers(Cursor::new(nodes), Cursor::new(edges), None).unwrap();
        assert_eq!(graph.node_tag, vec![NodeTag::Park, NodeTag::Normal, NodeTag::River]);
    }

    #[test]
    fn tag_column_is_optional() {
        let edges = "from,to,length\n10,11,110.0\n";
        let graph = load_graph_readers(Cursor::new(NODES), Cursor::new(edges), None).unwrap();
        assert!(graph.node_tag.iter().all(|&t| t == NodeTag::Normal));
    }

    #[test]
    fn weight_column_is_optional() {
        let edges = "from,to,length\n10,11,110.0\n";
        let graph = load_graph_readers(Cursor::new(NODES), Cursor::new(edges), None).unwrap();
        assert_eq!(graph.edge_weight, vec![110.0]);
    }

    #[test]
    fn area_filter_drops_far_nodes_and_their_edges() {
        let edges = "from,to,length\n10,11,110.0\n11,12,110.0\n12,99,9000.0\n";
        let area = GraphArea::new(GeoPoint::new(35.831, 128.75), 500.0);
        let graph = load_graph_readers(Cursor::new(NODES), Cursor::new(edges), Some(area)).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let p = DijkstraRouter
            .shortest_path(&graph, rr_core::NodeId(0), rr_core::NodeId(2), WeightKey::Length)
            .unwrap();
        assert_eq!(p.length_m, 220.0);
    }

    #[test]
    fn bad_row_is_a_parse_error() {
        let nodes = "id,lat,lon\n1,not-a-number,128.0\n";
        let result = load_graph_readers(Cursor::new(nodes), Cursor::new("from,to,length\n"), None);
        assert!(matches!(result, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn duplicate_node_is_a_parse_error() {
        let nodes = "id,lat,lon\n1,35.0,128.0\n1,35.1,128.0\n";
        let result = load_graph_readers(Cursor::new(nodes), Cursor::new("from,to,length\n"), None);
        assert!(matches!(result, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let nodes_path = dir.path().join("nodes.csv");
        let edges_path = dir.path().join("edges.csv");
        std::fs::File::create(&nodes_path).unwrap().write_all(NODES.as_bytes()).unwrap();
        std::fs::File::create(&edges_path)
            .unwrap()
            .write_all(b"from,to,length\n10,11,110.0\n11,10,110.0\n")
            .unwrap();

        let graph = load_graph_csv(&nodes_path, &edges_path, None).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_graph_csv(&dir.path().join("nope.csv"), &dir.path().join("nope2.csv"), None);
        assert!(matches!(result, Err(SpatialError::Io(_))));
    }
}
