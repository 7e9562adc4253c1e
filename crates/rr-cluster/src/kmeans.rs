//! Fixed-count clustering: Lloyd's k-means with k-means++ seeding.
//!
//! Points are treated as planar `(lat, lon)` pairs.  At the scale of a
//! single request graph (a few kilometres) the distortion is negligible for
//! picking waypoints.
//!
//! # Determinism
//!
//! All randomness comes from a [`SeedRng`] built from the configured seed.
//! Assignment ties go to the lowest center index, and a center whose group
//! empties out stays where it was.

use rr_core::{GeoPoint, SeedRng};

use crate::{ClusterCenter, Clusterer};

/// K-means with a fixed seed and iteration cap.
#[derive(Copy, Clone, Debug)]
pub struct KMeans {
    pub k:        usize,
    pub seed:     u64,
    pub max_iter: usize,
}

impl KMeans {
    pub fn new(k: usize, seed: u64, max_iter: usize) -> Self {
        Self { k, seed, max_iter }
    }
}

impl Clusterer for KMeans {
    fn cluster(&self, points: &[GeoPoint]) -> Vec<ClusterCenter> {
        let k = self.k.min(points.len());
        if k == 0 {
            return Vec::new();
        }

        let mut rng = SeedRng::new(self.seed);
        let mut centers = init_plus_plus(points, k, &mut rng);
        let mut assignment = vec![usize::MAX; points.len()];

        for _ in 0..self.max_iter.max(1) {
            let changed = assign(points, &centers, &mut assignment);
            update(points, &assignment, &mut centers);
            if !changed {
                break;
            }
        }
        // Final assignment against the settled centers for member counts.
        assign(points, &centers, &mut assignment);

        let mut members = vec![0usize; k];
        for &c in &assignment {
            members[c] += 1;
        }

        centers
            .into_iter()
            .zip(members)
            .map(|(position, members)| ClusterCenter { position, members })
            .collect()
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

#[inline]
fn sq_dist(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = a.lat - b.lat;
    let dlon = a.lon - b.lon;
    dlat * dlat + dlon * dlon
}

/// Index of the nearest center; ties go to the lowest index.
fn nearest(p: GeoPoint, centers: &[GeoPoint]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, &c) in centers.iter().enumerate() {
        let d = sq_dist(p, c);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

/// k-means++ seeding.
///
/// The first center is a uniformly drawn point.  Each following center is
/// drawn with probability proportional to the squared distance to the
/// nearest chosen center.  When every remaining weight is zero (duplicate
/// points) the lowest-index point not yet chosen is taken instead.
fn init_plus_plus(points: &[GeoPoint], k: usize, rng: &mut SeedRng) -> Vec<GeoPoint> {
    let n = points.len();
    let mut chosen = vec![false; n];
    let mut centers = Vec::with_capacity(k);

    let first = rng.gen_range(0..n);
    chosen[first] = true;
    centers.push(points[first]);

    let mut d2: Vec<f64> = points.iter().map(|&p| sq_dist(p, points[first])).collect();

    while centers.len() < k {
        let pick = rng
            .weighted_index(&d2)
            .or_else(|| chosen.iter().position(|&c| !c))
            .unwrap_or(0);
        chosen[pick] = true;
        let c = points[pick];
        centers.push(c);
        for (d, &p) in d2.iter_mut().zip(points) {
            *d = d.min(sq_dist(p, c));
        }
    }
    centers
}

/// Reassign every point.  Returns `true` if any assignment changed.
fn assign(points: &[GeoPoint], centers: &[GeoPoint], assignment: &mut [usize]) -> bool {
    let mut changed = false;
    for (slot, &p) in assignment.iter_mut().zip(points) {
        let c = nearest(p, centers);
        if *slot != c {
            *slot = c;
            changed = true;
        }
    }
    changed
}

/// Move every center to the mean of its members.
fn update(points: &[GeoPoint], assignment: &[usize], centers: &mut [GeoPoint]) {
    let mut sums = vec![(0.0f64, 0.0f64, 0usize); centers.len()];
    for (&c, &p) in assignment.iter().zip(points) {
        let s = &mut sums[c];
        s.0 += p.lat;
        s.1 += p.lon;
        s.2 += 1;
    }
    for (center, (lat, lon, count)) in centers.iter_mut().zip(sums) {
        if count > 0 {
            *center = GeoPoint::new(lat / count as f64, lon / count as f64);
        }
    }
}
