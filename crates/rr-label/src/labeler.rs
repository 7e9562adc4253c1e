//! Route labeling.
//!
//! | Category | Selected by                       | Measure                         |
//! |----------|-----------------------------------|---------------------------------|
//! | park     | `leisure=park`                    | area inside buffer / buffer area |
//! | river    | `waterway=river`                  | length inside buffer / route length |
//! | amenity  | any `shop` value                  | count                           |
//! | cross    | `highway=crossing`                | count                           |
//! | stops    | point with `highway=bus_stop` or `railway=subway_entrance` inside the buffer | coordinates |
//!
//! A category with no matching features is zero, never an error.

use geo::{
    Area, BooleanOps, Euclidean, Geometry, Intersects, Length, LineString, MultiLineString,
    MultiPolygon,
};

use rr_core::{GeoPoint, RouteConfig};

use crate::buffer::{LocalProjection, route_buffer, route_line};
use crate::{
    FEATURE_TAGS, FeatureSource, FeatureSummary, FeatureTable, LabelError, LabelResult, Labeled,
    StopKind, StopPoint,
};

/// Buffers routes and folds feature query results into summaries.
#[derive(Copy, Clone, Debug)]
pub struct FeatureLabeler {
    /// Buffer half-width in degrees.
    pub buffer_radius_deg: f64,
    /// Scale of the metric projection that measures inside the buffer.
    pub meters_per_degree: f64,
}

impl Default for FeatureLabeler {
    fn default() -> Self {
        Self::from_config(&RouteConfig::default())
    }
}

impl FeatureLabeler {
    pub fn new(buffer_radius_deg: f64, meters_per_degree: f64) -> Self {
        Self { buffer_radius_deg, meters_per_degree }
    }

    pub fn from_config(config: &RouteConfig) -> Self {
        Self::new(config.buffer_radius_deg(), config.meters_per_degree)
    }

    /// Buffer polygon for `coords`.
    pub fn buffer(&self, coords: &[GeoPoint]) -> LabelResult<MultiPolygon<f64>> {
        route_buffer(coords, self.buffer_radius_deg)
            .ok_or_else(|| LabelError::Geometry("cannot buffer an empty route".into()))
    }

    /// Query `source` around the route and summarize the result.
    pub fn label<S: FeatureSource + ?Sized>(
        &self,
        coords: &[GeoPoint],
        source: &S,
    ) -> LabelResult<Labeled> {
        let buffer = self.buffer(coords)?;
        let table = source.query(&buffer, &FEATURE_TAGS)?;
        Ok(self.summarize(coords, &buffer, &table))
    }

    /// Fold an already-fetched feature table into a summary.
    pub fn summarize(
        &self,
        coords: &[GeoPoint],
        buffer: &MultiPolygon<f64>,
        table:  &FeatureTable,
    ) -> Labeled {
        let Some(&origin) = coords.first() else {
            return Labeled::default();
        };
        let proj = LocalProjection::new(origin, self.meters_per_degree);

        let buffer_area  = proj.apply(buffer).unsigned_area();
        let route_length = Euclidean.length(&proj.apply(&route_line(coords)));

        let mut summary = FeatureSummary::default();
        let mut stops = Vec::new();

        for feature in table.iter() {
            if feature.has_tag("leisure", "park") {
                summary.park.count += 1;
                if let Some(polys) = polygons(&feature.geometry) {
                    summary.park.area_m2 += proj.apply(&buffer.intersection(&polys)).unsigned_area();
                }
            }
            if feature.has_tag("waterway", "river") {
                summary.river.count += 1;
                if let Some(lines) = lines(&feature.geometry) {
                    summary.river.length_m += Euclidean.length(&proj.apply(&buffer.clip(&lines, false)));
                }
            }
            if feature.tag("shop").is_some() {
                summary.amenity.count += 1;
            }
            if feature.has_tag("highway", "crossing") {
                summary.cross.count += 1;
            }
            if let Geometry::Point(p) = feature.geometry {
                let kind = if feature.has_tag("highway", "bus_stop") {
                    Some(StopKind::Bus)
                } else if feature.has_tag("railway", "subway_entrance") {
                    Some(StopKind::Subway)
                } else {
                    None
                };
                if let Some(kind) = kind.filter(|_| buffer.intersects(&p)) {
                    stops.push(StopPoint { kind, position: GeoPoint::new(p.y(), p.x()) });
                }
            }
        }

        summary.park.ratio  = ratio(summary.park.area_m2, buffer_area);
        summary.river.ratio = ratio(summary.river.length_m, route_length);

        Labeled { summary, stops }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `part / whole` clamped to `[0, 1]`; zero when `whole` is degenerate.
fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && part.is_finite() {
        (part / whole).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Areal part of a geometry.
fn polygons(geometry: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(p)      => Some(MultiPolygon::new(vec![p.clone()])),
        Geometry::MultiPolygon(m) => Some(m.clone()),
        Geometry::Rect(r)         => Some(MultiPolygon::new(vec![r.to_polygon()])),
        _                         => None,
    }
}

/// Linear part of a geometry.  Polygons contribute their exterior rings.
fn lines(geometry: &Geometry<f64>) -> Option<MultiLineString<f64>> {
    match geometry {
        Geometry::LineString(l)      => Some(MultiLineString::new(vec![l.clone()])),
        Geometry::MultiLineString(m) => Some(m.clone()),
        Geometry::Line(l)            => Some(MultiLineString::new(vec![LineString::from(vec![l.start, l.end])])),
        Geometry::Polygon(p)         => Some(MultiLineString::new(vec![p.exterior().clone()])),
        Geometry::MultiPolygon(m)    => Some(MultiLineString::new(m.iter().map(|p| p.exterior().clone()).collect())),
        _                            => None,
    }
}
