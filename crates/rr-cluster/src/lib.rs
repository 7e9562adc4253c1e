//! `rr-cluster` — reduces a graph's nodes to a handful of waypoint candidates.
//!
//! # Strategies
//!
//! | Strategy                                   | Group count        |
//! |--------------------------------------------|--------------------|
//! | [`KMeans`] (`ClusterStrategy::FixedCount`)  | exactly `k` (≤ n)  |
//! | [`DensityClusterer`] (`ClusterStrategy::Density`) | emergent     |
//!
//! Both operate on plain `(lat, lon)` pairs and return [`ClusterCenter`]s.
//! A center is a coordinate, not a graph node; the route generator snaps it
//! back onto the graph.

pub mod density;
pub mod kmeans;


use rr_core::{ClusterStrategy, GeoPoint};
use rr_spatial::WalkGraph;

pub use density::DensityClusterer;
pub use kmeans::KMeans;

// ── ClusterCenter ─────────────────────────────────────────────────────────────

/// Representative coordinate of one group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClusterCenter {
    pub position: GeoPoint,
    /// Number of input points assigned to this group.  Zero is possible for
    /// k-means groups that lost every member.
    pub members: usize,
}

// ── Clusterer trait ───────────────────────────────────────────────────────────

/// A waypoint clustering strategy.
///
/// Implementations must be deterministic: the same points give the same
/// centers in the same order.
pub trait Clusterer {
    fn cluster(&self, points: &[GeoPoint]) -> Vec<ClusterCenter>;
}

/// Build the clusterer selected by `strategy`.
pub fn clusterer_for(strategy: ClusterStrategy, seed: u64, max_iter: usize) -> Box<dyn Clusterer> {
    match strategy {
        ClusterStrategy::FixedCount { clusters } => Box::new(KMeans::new(clusters, seed, max_iter)),
        ClusterStrategy::Density { radius_m } => Box::new(DensityClusterer::new(radius_m)),
    }
}

/// Cluster `points` with the selected strategy.
pub fn cluster(
    points: &[GeoPoint],
    strategy: ClusterStrategy,
    seed: u64,
    max_iter: usize,
) -> Vec<ClusterCenter> {
    clusterer_for(strategy, seed, max_iter).cluster(points)
}

/// Cluster every node position of `graph`, in `NodeId` order.
pub fn cluster_graph(
    graph: &WalkGraph,
    strategy: ClusterStrategy,
    seed: u64,
    max_iter: usize,
) -> Vec<ClusterCenter> {
    cluster(&graph.node_pos, strategy, seed, max_iter)
}

/// `true` when a fixed-count request asks for more groups than there are
/// points, in which case the group count is reduced to `n_points`.
pub fn is_shrunk(strategy: ClusterStrategy, n_points: usize) -> bool {
    matches!(strategy, ClusterStrategy::FixedCount { clusters } if clusters > n_points)
}
