//! CSV graph loader.
//!
//! The pedestrian graph arrives from the map provider as two tables.
//!
//! ```csv
//! id,lat,lon,tag
//! 4410021,35.8310,128.7495,Duryu Park
//! 4410022,35.8318,128.7501,
//! ```
//!
//! ```csv
//! from,to,length,weight
//! 4410021,4410022,104.2,
//! 4410022,4410021,,
//! ```
//!
//! `id`, `from` and `to` are the provider's node keys.  The optional `tag`
//! column is classified with [`NodeTag::from_label`]; blank or missing means
//! a normal node.  A blank `length` is
//! filled with the great-circle distance between the endpoints; a blank or
//! missing `weight` defaults to the length.  Every row is one directed edge;
//! repeated `(from, to)` rows become parallel edges.
//!
//! An optional [`GraphArea`] keeps only the nodes inside a radius and the
//! edges whose endpoints both survive.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rr_core::{GeoPoint, NodeId, NodeTag};

use crate::network::{WalkGraph, WalkGraphBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  i64,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tag: Option<String>,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:   i64,
    to:     i64,
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    weight: Option<f64>,
}

// ── GraphArea ─────────────────────────────────────────────────────────────────

/// Circular area a graph is cut to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GraphArea {
    pub center:   GeoPoint,
    pub radius_m: f64,
}

impl GraphArea {
    pub fn new(center: GeoPoint, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    #[inline]
    pub fn contains(&self, pos: GeoPoint) -> bool {
        self.center.distance_m(pos) <= self.radius_m
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a graph from a node CSV and an edge CSV on disk.
pub fn load_graph_csv(
    nodes_path: &Path,
    edges_path: &Path,
    area: Option<GraphArea>,
) -> SpatialResult<WalkGraph> {
    let nodes = std::fs::File::open(nodes_path)?;
    let edges = std::fs::File::open(edges_path)?;
    load_graph_readers(nodes, edges, area)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
///
/// Edges that reference a node key absent from the node table (or cut away
/// by `area`) are skipped.
pub fn load_graph_readers<N: Read, E: Read>(
    nodes: N,
    edges: E,
    area: Option<GraphArea>,
) -> SpatialResult<WalkGraph> {
    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::Reader::from_reader(nodes);
    let mut builder = WalkGraphBuilder::new();
    let mut by_key: HashMap<i64, NodeId> = HashMap::new();

    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let pos = GeoPoint::new(row.lat, row.lon);
        if !row.lat.is_finite() || !row.lon.is_finite() {
            return Err(SpatialError::Parse(format!("node {} has invalid coordinates", row.id)));
        }
        if area.is_some_and(|a| !a.contains(pos)) {
            continue;
        }
        if by_key.contains_key(&row.id) {
            return Err(SpatialError::Parse(format!("duplicate node id {}", row.id)));
        }
        let id = builder.add_keyed_node(row.id, pos);
        if let Some(label) = &row.tag {
            builder.set_node_tag(id, NodeTag::from_label(label));
        }
        by_key.insert(row.id, id);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut edge_reader = csv::Reader::from_reader(edges);

    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let (Some(&from), Some(&to)) = (by_key.get(&row.from), by_key.get(&row.to)) else {
            continue;
        };
        let length_m = row
            .length
            .unwrap_or_else(|| builder.node_pos(from).distance_m(builder.node_pos(to)));
        builder.add_weighted_edge(from, to, length_m, row.weight.unwrap_or(length_m));
    }

    builder.build()
}
