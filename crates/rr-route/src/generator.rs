//! Tiered candidate generation.
//!
//! Candidates are tried in strict priority order:
//!
//! 1. the direct shortest path `start → end`;
//! 2. `start → w → end` for every waypoint `w`, in clustering order;
//! 3. `start → w1 → w2 → end` for every ordered pair of distinct waypoint
//!    indices (both directions, since one-way edges make cost asymmetric).
//!
//! A candidate is kept only if `route_through` finds a path and the path is
//! strictly shorter than `max_length_m`.  Rejected candidates cost nothing
//! against `max_paths`.  Generation stops as soon as `max_paths` candidates
//! are kept.
//!
//! # Parallelism
//!
//! With the `parallel` feature, combinations are evaluated in fixed-size
//! batches on Rayon's pool.  Each batch is collected in index order before
//! it is merged, so the output is identical to the sequential run.

use rr_core::{GeoPoint, NodeId, RouteConfig};
use rr_spatial::{Path, Router, SpatialError, SpatialResult, WalkGraph, WeightKey};

use crate::{CandidateRoute, RouteTier};

/// Combinations evaluated per Rayon batch.
#[cfg(feature = "parallel")]
const BATCH_SIZE: usize = 64;

/// `true` if a route of `length_m` fits under the `max_length_m` budget.
/// The bound is strict: a route exactly at the budget is rejected.
#[inline]
pub fn is_acceptable(length_m: f64, max_length_m: f64) -> bool {
    length_m < max_length_m
}

/// Builds a bounded, ordered set of candidate routes.
#[derive(Copy, Clone, Debug)]
pub struct RouteGenerator {
    pub max_paths:    usize,
    pub max_length_m: f64,
    pub weight:       WeightKey,
}

impl RouteGenerator {
    pub fn new(max_paths: usize, max_length_m: f64) -> Self {
        Self { max_paths, max_length_m, weight: WeightKey::Length }
    }

    pub fn from_config(config: &RouteConfig) -> Self {
        Self::new(config.max_paths, config.max_length_m)
    }

    /// Minimise `weight` instead of length.  The length budget still applies
    /// to the physical length.
    pub fn with_weight(mut self, weight: WeightKey) -> Self {
        self.weight = weight;
        self
    }

    /// Snap `start`, `end` and each waypoint to its nearest graph node and
    /// generate candidates between them.
    ///
    /// # Errors
    ///
    /// [`SpatialError::GraphEmpty`] if `graph` has no nodes.  Unreachable
    /// combinations are skipped, never reported.
    pub fn generate<R: Router + ?Sized>(
        &self,
        graph:     &WalkGraph,
        router:    &R,
        start:     GeoPoint,
        end:       GeoPoint,
        waypoints: &[GeoPoint],
    ) -> SpatialResult<Vec<CandidateRoute>> {
        let snap = |p: GeoPoint| graph.nearest_node(p).ok_or(SpatialError::GraphEmpty);

        let start = snap(start)?;
        let end   = snap(end)?;
        let waypoints = waypoints.iter().map(|&w| snap(w)).collect::<SpatialResult<Vec<_>>>()?;

        Ok(self.generate_between(graph, router, start, end, &waypoints))
    }

    /// Generate candidates between already-snapped nodes.
    ///
    /// Waypoints are addressed by index: two waypoints that snapped to the
    /// same node are still distinct for pairing.
    pub fn generate_between<R: Router + ?Sized>(
        &self,
        graph:     &WalkGraph,
        router:    &R,
        start:     NodeId,
        end:       NodeId,
        waypoints: &[NodeId],
    ) -> Vec<CandidateRoute> {
        let mut out = Vec::new();
        if self.max_paths == 0 {
            return out;
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (tier, via) in combinations(waypoints) {
                if let Some(path) = self.evaluate(graph, router, start, end, &via) {
                    push_candidate(&mut out, graph, tier, via, path);
                    if out.len() == self.max_paths {
                        break;
                    }
                }
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let combos: Vec<(RouteTier, Vec<NodeId>)> = combinations(waypoints).collect();

            'batches: for batch in combos.chunks(BATCH_SIZE) {
                let paths: Vec<Option<Path>> = batch
                    .par_iter()
                    .map(|(_, via)| self.evaluate(graph, router, start, end, via))
                    .collect();

                for ((tier, via), path) in batch.iter().zip(paths) {
                    if let Some(path) = path {
                        push_candidate(&mut out, graph, *tier, via.clone(), path);
                        if out.len() == self.max_paths {
                            break 'batches;
                        }
                    }
                }
            }
        }

        out
    }

    /// Route one combination and apply the length check.
    fn evaluate<R: Router + ?Sized>(
        &self,
        graph:  &WalkGraph,
        router: &R,
        start:  NodeId,
        end:    NodeId,
        via:    &[NodeId],
    ) -> Option<Path> {
        let mut points = Vec::with_capacity(via.len() + 2);
        points.push(start);
        points.extend_from_slice(via);
        points.push(end);

        let path = router.route_through(graph, &points, self.weight).ok()?;
        is_acceptable(path.length_m, self.max_length_m).then_some(path)
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

fn push_candidate(
    out:   &mut Vec<CandidateRoute>,
    graph: &WalkGraph,
    tier:  RouteTier,
    via:   Vec<NodeId>,
    path:  Path,
) {
    out.push(CandidateRoute {
        id:        out.len(),
        tier,
        waypoints: via,
        coords:    graph.coords(&path.nodes),
        nodes:     path.nodes,
        edges:     path.edges,
        length_m:  path.length_m,
    });
}

/// Every waypoint combination in priority order, lazily.
fn combinations(waypoints: &[NodeId]) -> impl Iterator<Item = (RouteTier, Vec<NodeId>)> + '_ {
    let n = waypoints.len();
    let direct = std::iter::once((RouteTier::Direct, Vec::new()));
    let single = waypoints.iter().map(|&w| (RouteTier::OneWaypoint, vec![w]));
    let pairs = (0..n).flat_map(move |i| {
        (0..n)
            .filter(move |&j| j != i)
            .map(move |j| (RouteTier::TwoWaypoints, vec![waypoints[i], waypoints[j]]))
    });
    direct.chain(single).chain(pairs)
}
