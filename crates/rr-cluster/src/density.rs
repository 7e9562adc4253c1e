//! Density clustering: groups of points connected within a great-circle
//! radius.
//!
//! Two points share a group if a chain of points, each within `radius_m` of
//! the next, joins them.  A point with no neighbour in range is a singleton.
//! This is DBSCAN with a minimum neighbourhood of one, so there is no noise
//! label.
//!
//! The radius is converted to an angle with [`EARTH_RADIUS_KM`] and queried
//! as a squared chord on an R-tree of unit-sphere vectors, which keeps the
//! neighbourhood test exact in great-circle terms.

use std::collections::VecDeque;

use rstar::RTree;
use rstar::primitives::GeomWithData;

use rr_core::geo::chord_2;
use rr_core::{EARTH_RADIUS_KM, GeoPoint};

use crate::{ClusterCenter, Clusterer};

type Entry = GeomWithData<[f64; 3], usize>;

/// Radius-connected grouping.
#[derive(Copy, Clone, Debug)]
pub struct DensityClusterer {
    pub radius_m: f64,
}

impl DensityClusterer {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }

    /// Radius as a central angle in radians.
    #[inline]
    pub fn radius_rad(&self) -> f64 {
        self.radius_m / 1_000.0 / EARTH_RADIUS_KM
    }

    /// Member indices of each group.  Groups are ordered by their lowest
    /// member index; members are listed in ascending index order.
    pub fn groups(&self, points: &[GeoPoint]) -> Vec<Vec<usize>> {
        let entries: Vec<Entry> = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new(p.unit_vector(), i))
            .collect();
        let tree = RTree::bulk_load(entries);
        let max_2 = chord_2(self.radius_rad());

        let mut visited = vec![false; points.len()];
        let mut groups = Vec::new();
        let mut queue = VecDeque::new();

        for seed in 0..points.len() {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            queue.push_back(seed);
            let mut group = Vec::new();

            while let Some(i) = queue.pop_front() {
                group.push(i);
                for hit in tree.locate_within_distance(points[i].unit_vector(), max_2) {
                    if !visited[hit.data] {
                        visited[hit.data] = true;
                        queue.push_back(hit.data);
                    }
                }
            }
            group.sort_unstable();
            groups.push(group);
        }
        groups
    }
}

impl Clusterer for DensityClusterer {
    fn cluster(&self, points: &[GeoPoint]) -> Vec<ClusterCenter> {
        self.groups(points)
            .into_iter()
            .map(|group| {
                let n = group.len() as f64;
                let (lat, lon) = group
                    .iter()
                    .fold((0.0, 0.0), |(lat, lon), &i| (lat + points[i].lat, lon + points[i].lon));
                ClusterCenter {
                    position: GeoPoint::new(lat / n, lon / n),
                    members:  group.len(),
                }
            })
            .collect()
    }
}
