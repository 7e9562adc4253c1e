//! Raw feature tables and the providers that fill them.
//!
//! A feature is a geometry plus a tag map, the tabular shape map providers
//! return for "everything inside this polygon".  Missing tags are simply
//! absent from the map.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use geo::{Geometry, Intersects, MultiPolygon};
use wkt::TryFromWkt;

use crate::{LabelError, LabelResult};

/// Tag keys requested for every route buffer.
pub const FEATURE_TAGS: [&str; 9] = [
    "leisure", "amenity", "highway", "incline", "lit", "bicycle", "waterway", "shop", "railway",
];

/// Name of the WKT geometry column in feature CSV files.
const GEOMETRY_COLUMN: &str = "geometry";

// ── Feature ───────────────────────────────────────────────────────────────────

/// One map feature.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub tags:     BTreeMap<String, String>,
}

impl Feature {
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self { geometry: geometry.into(), tags: BTreeMap::new() }
    }

    /// Builder-style tag setter.
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// `true` if `key` is present with exactly `value`.
    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tag(key) == Some(value)
    }
}

// ── FeatureTable ──────────────────────────────────────────────────────────────

/// Result of one feature query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureTable {
    pub features: Vec<Feature>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }
}

impl From<Vec<Feature>> for FeatureTable {
    fn from(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl FromIterator<Feature> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self { features: iter.into_iter().collect() }
    }
}

// ── FeatureSource trait ───────────────────────────────────────────────────────

/// External geometry/feature provider.
///
/// `query` returns the features that intersect `area` and carry at least one
/// of `tags`.  Implementations must be `Send + Sync`: routes are labeled
/// concurrently.
pub trait FeatureSource: Send + Sync {
    fn query(&self, area: &MultiPolygon<f64>, tags: &[&str]) -> LabelResult<FeatureTable>;
}

impl<F> FeatureSource for F
where
    F: Fn(&MultiPolygon<f64>, &[&str]) -> LabelResult<FeatureTable> + Send + Sync,
{
    fn query(&self, area: &MultiPolygon<f64>, tags: &[&str]) -> LabelResult<FeatureTable> {
        self(area, tags)
    }
}

// ── CsvFeatureSource ──────────────────────────────────────────────────────────

/// In-memory feature provider loaded from CSV.
///
/// ```csv
/// geometry,leisure,highway,shop,waterway,railway
/// "POLYGON((128.750 35.830,128.751 35.830,128.751 35.831,128.750 35.830))",park,,,,
/// POINT(128.7505 35.8302),,bus_stop,,,
/// ```
///
/// One `geometry` column holds WKT in `lon lat` order; every other column
/// is a tag.  Empty cells are missing tags.
#[derive(Clone, Debug, Default)]
pub struct CsvFeatureSource {
    features: Vec<Feature>,
}

impl CsvFeatureSource {
    pub fn from_path(path: &Path) -> LabelResult<Self> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> LabelResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        let geom_col = headers
            .iter()
            .position(|h| h == GEOMETRY_COLUMN)
            .ok_or_else(|| LabelError::Geometry(format!("missing `{GEOMETRY_COLUMN}` column")))?;

        let mut features = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let wkt = record.get(geom_col).unwrap_or_default();
            let geometry = Geometry::<f64>::try_from_wkt_str(wkt)
                .map_err(|e| LabelError::Geometry(format!("row {}: {e}", row + 1)))?;

            let tags = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|&(i, (_, value))| i != geom_col && !value.is_empty())
                .map(|(_, (key, value))| (key.to_owned(), value.to_owned()))
                .collect();

            features.push(Feature { geometry, tags });
        }
        Ok(Self { features })
    }

    pub fn from_features(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FeatureSource for CsvFeatureSource {
    fn query(&self, area: &MultiPolygon<f64>, tags: &[&str]) -> LabelResult<FeatureTable> {
        Ok(self
            .features
            .iter()
            .filter(|f| tags.iter().any(|t| f.tags.contains_key(*t)))
            .filter(|f| area.intersects(&f.geometry))
            .cloned()
            .collect())
    }
}
