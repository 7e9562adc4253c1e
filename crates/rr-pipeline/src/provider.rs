//! External collaborators: the map/graph provider and the geocoder.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use rr_core::GeoPoint;
use rr_spatial::{GraphArea, WalkGraph, load_graph_csv};

use crate::{PipelineError, PipelineResult};

// ── Graph providers ───────────────────────────────────────────────────────────

/// Supplies the pedestrian graph around a point.
pub trait GraphProvider: Send + Sync {
    /// Graph covering a circle of `radius_m` around `center`.  An area with
    /// no walkable nodes yields an empty graph, not an error.
    fn fetch(&self, center: GeoPoint, radius_m: f64) -> PipelineResult<WalkGraph>;
}

/// Reads the node and edge CSV files on every request and keeps the part
/// inside the requested circle.
#[derive(Clone, Debug)]
pub struct CsvGraphProvider {
    nodes_path: PathBuf,
    edges_path: PathBuf,
}

impl CsvGraphProvider {
    pub fn new(nodes_path: impl Into<PathBuf>, edges_path: impl Into<PathBuf>) -> Self {
        Self { nodes_path: nodes_path.into(), edges_path: edges_path.into() }
    }
}

impl GraphProvider for CsvGraphProvider {
    fn fetch(&self, center: GeoPoint, radius_m: f64) -> PipelineResult<WalkGraph> {
        let area = GraphArea::new(center, radius_m);
        Ok(load_graph_csv(&self.nodes_path, &self.edges_path, Some(area))?)
    }
}

/// Hands out a prebuilt graph regardless of the requested area.
#[derive(Clone)]
pub struct StaticGraphProvider {
    graph: WalkGraph,
}

impl StaticGraphProvider {
    pub fn new(graph: WalkGraph) -> Self {
        Self { graph }
    }
}

impl GraphProvider for StaticGraphProvider {
    fn fetch(&self, _center: GeoPoint, _radius_m: f64) -> PipelineResult<WalkGraph> {
        Ok(self.graph.clone())
    }
}

// ── Geocoders ─────────────────────────────────────────────────────────────────

/// Resolves free-text addresses.
pub trait Geocoder: Send + Sync {
    /// `None` when the address cannot be resolved.
    fn geocode(&self, address: &str) -> Option<GeoPoint>;
}

/// Geocoder that resolves nothing.  Requests must use coordinates.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    fn geocode(&self, _address: &str) -> Option<GeoPoint> {
        None
    }
}

#[derive(Deserialize)]
struct AddressRecord {
    address: String,
    lat:     f64,
    lon:     f64,
}

/// Lookup-table geocoder.
///
/// Matching ignores case and collapses runs of whitespace, so
/// `"  Daegu   Univ "` finds `"daegu univ"`.
#[derive(Clone, Debug, Default)]
pub struct TableGeocoder {
    entries: HashMap<String, GeoPoint>,
}

impl TableGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: &str, pos: GeoPoint) {
        self.entries.insert(normalize(address), pos);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load an `address,lat,lon` CSV.  Later rows override earlier ones.
    pub fn from_reader<R: Read>(reader: R) -> PipelineResult<Self> {
        let mut table = Self::new();
        for result in csv::Reader::from_reader(reader).deserialize::<AddressRecord>() {
            let row = result.map_err(|e| PipelineError::Provider(format!("geocode table: {e}")))?;
            table.insert(&row.address, GeoPoint::new(row.lat, row.lon));
        }
        Ok(table)
    }

    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| PipelineError::Provider(format!("{}: {e}", path.display())))?;
        Self::from_reader(file)
    }
}

impl Geocoder for TableGeocoder {
    fn geocode(&self, address: &str) -> Option<GeoPoint> {
        self.entries.get(&normalize(address)).copied()
    }
}

fn normalize(address: &str) -> String {
    address.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
