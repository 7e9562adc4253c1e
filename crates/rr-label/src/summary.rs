//! Per-route feature statistics.
//!
//! Ratios are plain fractions in `[0, 1]`; percentage strings are a
//! presentation concern.

use rr_core::GeoPoint;

/// Count, clipped area and area ratio of a polygon category.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaStats {
    pub count:   usize,
    /// Square metres inside the buffer.
    pub area_m2: f64,
    /// `area_m2` over the buffer area.
    pub ratio:   f64,
}

/// Count, clipped length and length ratio of a line category.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LengthStats {
    pub count:    usize,
    /// Metres inside the buffer.
    pub length_m: f64,
    /// `length_m` over the route length.
    pub ratio:    f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountStats {
    pub count: usize,
}

/// What a route passes by.  `Default` is the all-zero summary used when a
/// feature query fails.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureSummary {
    pub park:    AreaStats,
    pub river:   LengthStats,
    pub amenity: CountStats,
    pub cross:   CountStats,
}

// ── Stops ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StopKind {
    Bus,
    Subway,
}

/// A transit stop found inside a route buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopPoint {
    pub kind:     StopKind,
    pub position: GeoPoint,
}

/// Labeling output for one route.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Labeled {
    pub summary: FeatureSummary,
    pub stops:   Vec<StopPoint>,
}
