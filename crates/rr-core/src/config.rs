//! Request-independent tuning knobs.
//!
//! Typically loaded from a JSON file by the application crate (enable the
//! `serde` feature) and passed to the pipeline builder.  Every field has a
//! default, so a partial file only overrides what it names.

use crate::{CoreError, CoreResult};

/// Default metres per degree, for both the buffer radius and the metric
/// projection that measures inside the buffer.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

// ── ClusterStrategy ───────────────────────────────────────────────────────────

/// How graph nodes are reduced to waypoint candidates.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "method", rename_all = "snake_case")
)]
pub enum ClusterStrategy {
    /// K-means with exactly `clusters` groups (shrunk to the node count).
    FixedCount { clusters: usize },
    /// Radius-connected groups; the group count is emergent.
    Density { radius_m: f64 },
}

impl Default for ClusterStrategy {
    fn default() -> Self {
        ClusterStrategy::FixedCount { clusters: 10 }
    }
}

// ── RouteConfig ───────────────────────────────────────────────────────────────

/// Top-level route-generation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RouteConfig {
    /// Radius of the pedestrian graph requested around the start/end midpoint.
    pub graph_radius_m: f64,

    /// Waypoint clustering strategy.
    pub cluster: ClusterStrategy,

    /// Seed for k-means initialisation.  Same seed, same centers.
    pub kmeans_seed: u64,

    /// Relocation passes before k-means gives up on convergence.
    pub kmeans_max_iter: usize,

    /// Candidate routes accumulated before generation stops.
    pub max_paths: usize,

    /// Routes must be strictly shorter than this (metres).
    pub max_length_m: f64,

    /// Routes labeled and returned to the caller.
    pub max_results: usize,

    /// Running pace in minutes per kilometre.
    pub pace_min_per_km: f64,

    /// Assumed bus speed.
    pub bus_speed_kmh: f64,

    /// Assumed subway speed.
    pub subway_speed_kmh: f64,

    /// Half-width of the feature buffer around a route.
    pub buffer_radius_m: f64,

    /// Metres per degree.  Converts the buffer radius to degrees and scales
    /// the local projection used for areas and lengths.
    pub meters_per_degree: f64,

    /// Stop points farther than this from every graph node are not snapped.
    pub stop_snap_radius_m: f64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            graph_radius_m:     1_000.0,
            cluster:            ClusterStrategy::default(),
            kmeans_seed:        42,
            kmeans_max_iter:    300,
            max_paths:          20,
            max_length_m:       7_000.0,
            max_results:        10,
            pace_min_per_km:    6.0,
            bus_speed_kmh:      20.0,
            subway_speed_kmh:   30.0,
            buffer_radius_m:    100.0,
            meters_per_degree:  METERS_PER_DEGREE,
            stop_snap_radius_m: 50.0,
            num_threads:        None,
        }
    }
}

impl RouteConfig {
    /// Reject values that would make route generation meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        let positive = [
            ("graph_radius_m",    self.graph_radius_m),
            ("max_length_m",      self.max_length_m),
            ("pace_min_per_km",   self.pace_min_per_km),
            ("bus_speed_kmh",     self.bus_speed_kmh),
            ("subway_speed_kmh",  self.subway_speed_kmh),
            ("buffer_radius_m",   self.buffer_radius_m),
            ("meters_per_degree", self.meters_per_degree),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::Config(format!("{name} must be positive, got {value}")));
            }
        }

        if !self.stop_snap_radius_m.is_finite() || self.stop_snap_radius_m < 0.0 {
            return Err(CoreError::Config(format!(
                "stop_snap_radius_m must be non-negative, got {}",
                self.stop_snap_radius_m
            )));
        }

        match self.cluster {
            ClusterStrategy::FixedCount { .. } => {}
            ClusterStrategy::Density { radius_m } => {
                if !radius_m.is_finite() || radius_m <= 0.0 {
                    return Err(CoreError::Config(format!(
                        "density radius_m must be positive, got {radius_m}"
                    )));
                }
            }
        }

        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }

        Ok(())
    }

    /// Buffer half-width expressed in degrees.
    #[inline]
    pub fn buffer_radius_deg(&self) -> f64 {
        self.buffer_radius_m / self.meters_per_degree
    }
}
