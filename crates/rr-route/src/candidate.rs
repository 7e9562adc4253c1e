//! Accepted candidate routes.

use rr_core::{EdgeId, GeoPoint, NodeId};

/// Number of intermediate waypoints a candidate was routed through.
///
/// Variants are declared in generation priority order, so sorting by tier
/// reproduces the generator's output order across tiers.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RouteTier {
    Direct,
    OneWaypoint,
    TwoWaypoints,
}

impl RouteTier {
    pub fn waypoint_count(self) -> usize {
        match self {
            RouteTier::Direct       => 0,
            RouteTier::OneWaypoint  => 1,
            RouteTier::TwoWaypoints => 2,
        }
    }
}

/// A path from start to end that passed the length check.
///
/// `nodes`, `edges` and `coords` are parallel in the usual way:
/// `edges[i]` joins `nodes[i]` to `nodes[i + 1]` and `coords[i]` is the
/// position of `nodes[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateRoute {
    /// Position in the generator's output, starting at 0.
    pub id:        usize,
    pub tier:      RouteTier,
    /// Snapped waypoint nodes the path was forced through, in visiting order.
    pub waypoints: Vec<NodeId>,
    pub nodes:     Vec<NodeId>,
    pub edges:     Vec<EdgeId>,
    pub coords:    Vec<GeoPoint>,
    /// Sum of the traversed edge lengths in metres.
    pub length_m:  f64,
}

impl CandidateRoute {
    #[inline]
    pub fn length_km(&self) -> f64 {
        self.length_m / 1_000.0
    }
}
