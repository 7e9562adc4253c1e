//! Expansion of a candidate into running and running+transit variants.
//!
//! Every non-empty route yields a `run` variant covering the whole path.
//! Each node before the final one that is a known stop adds one more
//! variant: run up to that node, then ride the rest of the route.
//!
//! ```text
//! nodes:  n0 ── n1 ── n2 ── n3 ── n4
//! edges:     e0    e1    e2    e3
//!                   ▲ bus stop at n2
//! run:      e0 e1            (prefix up to and including n2)
//! transit:        e2 e3      (suffix from n2 to the end)
//! ```
//!
//! A node that is both a bus stop and a subway entrance splits as bus.
//! Transit variants carry the full route geometry; the split point lives
//! in [`SplitMeta`].

use rr_core::{GeoPoint, NodeId, RouteConfig, TravelMode};
use rr_spatial::WalkGraph;

use crate::CandidateRoute;

#[cfg(not(feature = "fx-hash"))]
pub type StopSet = std::collections::HashSet<NodeId>;

#[cfg(feature = "fx-hash")]
pub type StopSet = rustc_hash::FxHashSet<NodeId>;

// ── StopNodes ─────────────────────────────────────────────────────────────────

/// Graph nodes known to be transit stops.
#[derive(Clone, Debug, Default)]
pub struct StopNodes {
    pub bus:    StopSet,
    pub subway: StopSet,
}

impl StopNodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bus.is_empty() && self.subway.is_empty()
    }

    /// Transit mode available at `node`.  Bus wins when both apply.
    pub fn mode_at(&self, node: NodeId) -> Option<TravelMode> {
        if self.bus.contains(&node) {
            Some(TravelMode::RunBus)
        } else if self.subway.contains(&node) {
            Some(TravelMode::RunSubway)
        } else {
            None
        }
    }
}

// ── ExpandedRoute ─────────────────────────────────────────────────────────────

/// Where a transit variant leaves the running path.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitMeta {
    pub split_node:          NodeId,
    /// Position of `split_node` in the route's node sequence.
    pub split_index:         usize,
    pub transit_time_min:    f64,
    pub transit_distance_km: f64,
}

/// One way of travelling a candidate route.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedRoute {
    pub route_id:            usize,
    pub mode:                TravelMode,
    /// Full route geometry as `(lat, lon)`, identical for every variant.
    pub coords:              Vec<GeoPoint>,
    pub total_time_min:      f64,
    pub running_time_min:    f64,
    pub running_distance_km: f64,
    /// `None` for the `run` variant.
    pub split:               Option<SplitMeta>,
}

// ── TransitSplitter ───────────────────────────────────────────────────────────

/// Splits routes at transit stops.
#[derive(Copy, Clone, Debug)]
pub struct TransitSplitter {
    pub pace_min_per_km:  f64,
    pub bus_speed_kmh:    f64,
    pub subway_speed_kmh: f64,
}

impl Default for TransitSplitter {
    fn default() -> Self {
        Self::from_config(&RouteConfig::default())
    }
}

impl TransitSplitter {
    pub fn from_config(config: &RouteConfig) -> Self {
        Self {
            pace_min_per_km:  config.pace_min_per_km,
            bus_speed_kmh:    config.bus_speed_kmh,
            subway_speed_kmh: config.subway_speed_kmh,
        }
    }

    fn speed_kmh(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::RunSubway => self.subway_speed_kmh,
            _                     => self.bus_speed_kmh,
        }
    }

    /// Expand one route.  Returns an empty list only for an empty route, and
    /// only the run variant when `edges` does not line up with `nodes`.
    pub fn expand(
        &self,
        route: &CandidateRoute,
        graph: &WalkGraph,
        stops: &StopNodes,
    ) -> Vec<ExpandedRoute> {
        let Some(last) = route.nodes.len().checked_sub(1) else {
            return Vec::new();
        };

        let total_km = graph.edges_length(&route.edges) / 1_000.0;
        let run_min  = total_km * self.pace_min_per_km;

        let mut out = vec![ExpandedRoute {
            route_id:            route.id,
            mode:                TravelMode::Run,
            coords:              route.coords.clone(),
            total_time_min:      run_min,
            running_time_min:    run_min,
            running_distance_km: total_km,
            split:               None,
        }];

        // Splits need `edges[i]` to join `nodes[i]` and `nodes[i + 1]`.
        if route.edges.len() != last {
            return out;
        }

        for (i, &node) in route.nodes[..last].iter().enumerate() {
            let Some(mode) = stops.mode_at(node) else { continue };

            let run_km     = graph.edges_length(&route.edges[..i]) / 1_000.0;
            let transit_km = graph.edges_length(&route.edges[i..]) / 1_000.0;
            let run_min     = run_km * self.pace_min_per_km;
            let transit_min = transit_km / self.speed_kmh(mode) * 60.0;

            out.push(ExpandedRoute {
                route_id:            route.id,
                mode,
                coords:              route.coords.clone(),
                total_time_min:      run_min + transit_min,
                running_time_min:    run_min,
                running_distance_km: run_km,
                split: Some(SplitMeta {
                    split_node:          node,
                    split_index:         i,
                    transit_time_min:    transit_min,
                    transit_distance_km: transit_km,
                }),
            });
        }

        out
    }

    /// Expand every route, keeping route order.
    pub fn expand_all(
        &self,
        routes: &[CandidateRoute],
        graph:  &WalkGraph,
        stops:  &StopNodes,
    ) -> Vec<ExpandedRoute> {
        routes.iter().flat_map(|r| self.expand(r, graph, stops)).collect()
    }
}
