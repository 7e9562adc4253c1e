use std::collections::HashSet;

use log::{debug, info, warn};

use rr_cluster::{cluster_graph, is_shrunk};
use rr_core::{GeoPoint, Preferences, RouteConfig};
use rr_label::{FeatureLabeler, FeatureSource, Labeled, StopKind, StopPoint};
use rr_route::{CandidateRoute, RouteGenerator, StopNodes, TransitSplitter};
use rr_spatial::{Router, SpatialError, WalkGraph, WeightKey};

use crate::{
    AnnotatedRoute, Geocoder, GraphProvider, PipelineError, PipelineResult, RouteResponse,
    RouteScorer,
};

// ── Request ───────────────────────────────────────────────────────────────────

/// A start or end point as the caller gave it.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
    Coord(GeoPoint),
    Address(String),
}

impl Location {
    pub fn coord(lat: f64, lon: f64) -> Self {
        Location::Coord(GeoPoint::new(lat, lon))
    }

    pub fn address(text: impl Into<String>) -> Self {
        Location::Address(text.into())
    }
}

/// One recommendation request.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteRequest {
    pub start:       Location,
    pub end:         Location,
    /// Overrides `RouteConfig::max_results` when set.
    pub max_results: Option<usize>,
    /// Neutral by default, which routes by plain length.
    pub preferences: Preferences,
}

impl RouteRequest {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end, max_results: None, preferences: Preferences::default() }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

// ── RoutePipeline ─────────────────────────────────────────────────────────────

/// Turns requests into annotated routes.  Built by
/// [`PipelineBuilder`](crate::PipelineBuilder).
///
/// Holds no per-request state; `recommend` takes `&self` and may be called
/// from several threads at once.
pub struct RoutePipeline<R: Router> {
    pub(crate) config:   RouteConfig,
    pub(crate) router:   R,
    pub(crate) graphs:   Box<dyn GraphProvider>,
    pub(crate) features: Box<dyn FeatureSource>,
    pub(crate) geocoder: Box<dyn Geocoder>,
    pub(crate) scorer:   Box<dyn RouteScorer>,
}

impl<R: Router> RoutePipeline<R> {
    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Run one request end to end.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::LocationNotFound`] if an address does not resolve.
    /// - [`PipelineError::GraphEmpty`] if the provider has no nodes or no
    ///   edges around the request.
    /// - [`PipelineError::Provider`] / [`PipelineError::Spatial`] if the
    ///   graph provider itself fails.
    pub fn recommend(&self, request: &RouteRequest) -> PipelineResult<RouteResponse> {
        let cfg = &self.config;

        // ── ① Resolve ─────────────────────────────────────────────────────
        let start = self.resolve(&request.start)?;
        let end   = self.resolve(&request.end)?;
        info!("routing {start} -> {end}");

        // ── ② Graph ───────────────────────────────────────────────────────
        let mut graph = self.graphs.fetch(start.midpoint(end), cfg.graph_radius_m)?;
        if graph.is_empty() || graph.edge_count() == 0 {
            return Err(PipelineError::GraphEmpty);
        }
        info!("graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());

        let weight = if request.preferences.is_neutral() {
            WeightKey::Length
        } else {
            let changed = graph.apply_preferences(&request.preferences);
            info!("preferences reweighted {changed} edges");
            WeightKey::Weight
        };

        // ── ③ Cluster ─────────────────────────────────────────────────────
        if is_shrunk(cfg.cluster, graph.node_count()) {
            warn!(
                "fewer nodes ({}) than requested clusters; using one cluster per node",
                graph.node_count()
            );
        }
        let centers = cluster_graph(&graph, cfg.cluster, cfg.kmeans_seed, cfg.kmeans_max_iter);
        let waypoints: Vec<GeoPoint> = centers.iter().map(|c| c.position).collect();
        info!("{} waypoint centers", waypoints.len());

        // ── ④ Generate ────────────────────────────────────────────────────
        let mut candidates = RouteGenerator::from_config(cfg)
            .with_weight(weight)
            .generate(&graph, &self.router, start, end, &waypoints)
            .map_err(|e| match e {
                SpatialError::GraphEmpty => PipelineError::GraphEmpty,
                other => PipelineError::Spatial(other),
            })?;
        let generated = candidates.len();
        candidates.truncate(request.max_results.unwrap_or(cfg.max_results));
        info!("{generated} candidates accepted, keeping {}", candidates.len());

        // ── ⑤ Label ───────────────────────────────────────────────────────
        let labels = self.label_all(&candidates);

        // ── ⑥ Split ───────────────────────────────────────────────────────
        let stops = dedup_stops(labels.iter().filter_map(|l| l.as_ref()).flat_map(|l| &l.stops));
        let stop_nodes = snap_stops(&graph, &stops, cfg.stop_snap_radius_m);
        debug!(
            "{} distinct stops, {} bus / {} subway nodes",
            stops.len(),
            stop_nodes.bus.len(),
            stop_nodes.subway.len()
        );
        let splitter = TransitSplitter::from_config(cfg);

        // ── ⑦ Annotate & score ────────────────────────────────────────────
        let paths = candidates
            .into_iter()
            .zip(labels)
            .map(|(route, label)| {
                let variants = splitter.expand(&route, &graph, &stop_nodes);
                let label_failed = label.is_none();
                let Labeled { summary, stops } = label.unwrap_or_default();
                let mut annotated = AnnotatedRoute {
                    route,
                    summary,
                    stops,
                    variants,
                    recommend: None,
                    label_failed,
                };
                annotated.recommend = self.scorer.score(&annotated);
                annotated
            })
            .collect();

        Ok(RouteResponse { paths, stops })
    }

    fn resolve(&self, location: &Location) -> PipelineResult<GeoPoint> {
        match location {
            Location::Coord(p) => Ok(*p),
            Location::Address(text) => self
                .geocoder
                .geocode(text)
                .ok_or_else(|| PipelineError::LocationNotFound(text.clone())),
        }
    }

    /// Label every candidate.  A failed query is logged and yields `None`;
    /// the route itself is kept.
    fn label_all(&self, candidates: &[CandidateRoute]) -> Vec<Option<Labeled>> {
        let labeler = FeatureLabeler::from_config(&self.config);
        let features = self.features.as_ref();

        let label_one = |route: &CandidateRoute| match labeler.label(&route.coords, features) {
            Ok(labeled) => {
                debug!(
                    "route {}: {} parks, {} rivers, {} shops, {} crossings, {} stops",
                    route.id,
                    labeled.summary.park.count,
                    labeled.summary.river.count,
                    labeled.summary.amenity.count,
                    labeled.summary.cross.count,
                    labeled.stops.len()
                );
                Some(labeled)
            }
            Err(e) => {
                warn!("route {}: labeling failed, using empty features: {e}", route.id);
                None
            }
        };

        #[cfg(not(feature = "parallel"))]
        {
            candidates.iter().map(label_one).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            candidates.par_iter().map(label_one).collect()
        }
    }
}

// ── Stop helpers ──────────────────────────────────────────────────────────────

/// Stops in first-seen order with exact duplicates removed.
fn dedup_stops<'a>(stops: impl Iterator<Item = &'a StopPoint>) -> Vec<StopPoint> {
    let mut seen = HashSet::new();
    stops
        .filter(|s| seen.insert((s.kind, s.position.lat.to_bits(), s.position.lon.to_bits())))
        .copied()
        .collect()
}

/// Map stops onto graph nodes.  Stops with no node within `radius_m` are
/// dropped.
fn snap_stops(graph: &WalkGraph, stops: &[StopPoint], radius_m: f64) -> StopNodes {
    let mut nodes = StopNodes::new();
    for stop in stops {
        let Some(node) = graph.nearest_node_within(stop.position, radius_m) else { continue };
        match stop.kind {
            StopKind::Bus    => nodes.bus.insert(node),
            StopKind::Subway => nodes.subway.insert(node),
        };
    }
    nodes
}
