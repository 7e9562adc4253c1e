//! Fixed-seed RNG wrapper.
//!
//! Clustering must produce the same centers for the same input on every run,
//! so all randomness flows from an explicit seed through `SeedRng`.  Nothing
//! in the workspace draws from an OS-seeded generator.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Deterministic RNG seeded from a caller-supplied `u64`.
///
/// Used only in single-threaded contexts.
pub struct SeedRng(SmallRng);

impl SeedRng {
    pub fn new(seed: u64) -> Self {
        SeedRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` when every weight is zero (or the slice is empty), so
    /// callers can fall back to a deterministic choice.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if total.is_nan() || total <= 0.0 {
            return None;
        }
        let mut target = self.0.r#gen::<f64>() * total;
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            if target < w {
                return Some(i);
            }
            target -= w;
        }
        // Float round-off: fall back to the last positive weight.
        weights.iter().rposition(|&w| w > 0.0)
    }
}
