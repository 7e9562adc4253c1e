//! Response shape and the scoring hook.
//!
//! Serialized form of one path:
//!
//! ```json
//! {
//!   "path-id": 0,
//!   "feature": {
//!     "park":    { "count": 2, "area": 5120.4, "ratio": "12.34%" },
//!     "river":   { "count": 1, "length": 310.0, "ratio": "20.00%" },
//!     "amenity": { "count": 4 },
//!     "cross":   { "count": 7 }
//!   },
//!   "recommend": null,
//!   "length": 1543.2,
//!   "variants": [ { "mode": "run", "total-time": 9.26, ... } ],
//!   "coord": [[35.8304, 128.7544], ...]
//! }
//! ```
//!
//! Ratios become percentage strings here and nowhere else.

use serde::{Serialize, Serializer};

use rr_core::TravelMode;
use rr_label::{FeatureSummary, StopKind, StopPoint};
use rr_route::{CandidateRoute, ExpandedRoute, SplitMeta};

/// `0.1234` → `"12.34%"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

// ── Scoring hook ──────────────────────────────────────────────────────────────

/// Externally computed recommendation for one route.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub similarity:        f64,
    pub pace_score:        f64,
    pub final_score:       f64,
    pub recommended_pace:  f64,
    pub expected_time_min: f64,
}

/// Attaches a [`Recommendation`] to each annotated route.
pub trait RouteScorer: Send + Sync {
    fn score(&self, route: &AnnotatedRoute) -> Option<Recommendation>;
}

/// Leaves every recommendation empty.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoScorer;

impl RouteScorer for NoScorer {
    fn score(&self, _route: &AnnotatedRoute) -> Option<Recommendation> {
        None
    }
}

// ── AnnotatedRoute / RouteResponse ────────────────────────────────────────────

/// A candidate with everything attached to it after generation.
#[derive(Clone, Debug)]
pub struct AnnotatedRoute {
    pub route:     CandidateRoute,
    pub summary:   FeatureSummary,
    /// Stops found in this route's buffer.
    pub stops:     Vec<StopPoint>,
    /// `run` first, then one transit variant per stop node along the route.
    pub variants:  Vec<ExpandedRoute>,
    pub recommend: Option<Recommendation>,
    /// `true` if the feature query failed and `summary` is the zero value.
    pub label_failed: bool,
}

/// The whole answer to one request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RouteResponse {
    pub paths: Vec<AnnotatedRoute>,
    /// De-duplicated stops across every labeled route.
    #[serde(serialize_with = "serialize_stops")]
    pub stops: Vec<StopPoint>,
}

impl RouteResponse {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

// ── Serialization views ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct PathView<'a> {
    #[serde(rename = "path-id")]
    path_id:   usize,
    feature:   FeatureView,
    recommend: Option<&'a Recommendation>,
    length:    f64,
    variants:  Vec<VariantView>,
    coord:     Vec<[f64; 2]>,
}

#[derive(Serialize)]
struct FeatureView {
    park:    AreaView,
    river:   LengthView,
    amenity: CountView,
    cross:   CountView,
}

#[derive(Serialize)]
struct AreaView {
    count: usize,
    area:  f64,
    ratio: String,
}

#[derive(Serialize)]
struct LengthView {
    count:  usize,
    length: f64,
    ratio:  String,
}

#[derive(Serialize)]
struct CountView {
    count: usize,
}

#[derive(Serialize)]
struct VariantView {
    mode: TravelMode,
    #[serde(rename = "total-time")]
    total_time_min: f64,
    #[serde(rename = "running-time")]
    running_time_min: f64,
    #[serde(rename = "running-distance")]
    running_distance_km: f64,
    split: Option<SplitMeta>,
}

#[derive(Serialize)]
struct StopView {
    kind:  StopKind,
    coord: [f64; 2],
}

impl From<&FeatureSummary> for FeatureView {
    fn from(s: &FeatureSummary) -> Self {
        FeatureView {
            park: AreaView {
                count: s.park.count,
                area:  s.park.area_m2,
                ratio: format_ratio(s.park.ratio),
            },
            river: LengthView {
                count:  s.river.count,
                length: s.river.length_m,
                ratio:  format_ratio(s.river.ratio),
            },
            amenity: CountView { count: s.amenity.count },
            cross:   CountView { count: s.cross.count },
        }
    }
}

impl From<&ExpandedRoute> for VariantView {
    fn from(v: &ExpandedRoute) -> Self {
        VariantView {
            mode:                v.mode,
            total_time_min:      v.total_time_min,
            running_time_min:    v.running_time_min,
            running_distance_km: v.running_distance_km,
            split:               v.split,
        }
    }
}

impl Serialize for AnnotatedRoute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PathView {
            path_id:   self.route.id,
            feature:   FeatureView::from(&self.summary),
            recommend: self.recommend.as_ref(),
            length:    self.route.length_m,
            variants:  self.variants.iter().map(VariantView::from).collect(),
            coord:     self.route.coords.iter().map(|p| [p.lat, p.lon]).collect(),
        }
        .serialize(serializer)
    }
}

fn serialize_stops<S: Serializer>(stops: &[StopPoint], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(stops.iter().map(|s| StopView {
        kind:  s.kind,
        coord: [s.position.lat, s.position.lon],
    }))
}
