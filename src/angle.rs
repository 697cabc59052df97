//! Angle utilities and the gradient-direction quantizer.
//!
//! Learning and voting must index the r-table with the very same quantizer;
//! the r-table stores its bucket count so both phases agree.
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Default number of direction buckets (width 2π/64).
pub const DEFAULT_DIRECTION_BUCKETS: usize = 64;

/// Wraps an angle into [0, 2π).
#[inline]
pub fn wrap_two_pi(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Maps `angle` (any real, taken modulo 2π) to a bucket in `[0, buckets)`.
///
/// Computes `floor((angle / width + 0.5) mod buckets)` with `width = 2π / buckets`,
/// so angle 0 sits in the middle of bucket 0. Non-finite angles map to 0.
#[inline]
pub fn direction_bucket(angle: f32, buckets: usize) -> usize {
    debug_assert!(buckets > 0, "direction quantizer requires at least one bucket");
    if !angle.is_finite() || buckets == 0 {
        return 0;
    }
    let n = buckets as f64;
    let width = std::f64::consts::TAU / n;
    let pos = (angle as f64 / width + 0.5).rem_euclid(n);
    (pos.floor() as usize).min(buckets - 1)
}

/// Uniform direction quantizer over [0, 2π).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionQuantizer {
    buckets: usize,
}

impl Default for DirectionQuantizer {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_DIRECTION_BUCKETS,
        }
    }
}

impl DirectionQuantizer {
    /// Returns `None` for a zero bucket count.
    pub fn new(buckets: usize) -> Option<Self> {
        (buckets > 0).then_some(Self { buckets })
    }

    #[inline]
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Angular width of one bucket in radians.
    #[inline]
    pub fn bucket_width(&self) -> f32 {
        TAU / self.buckets as f32
    }

    #[inline]
    pub fn bucket(&self, angle: f32) -> usize {
        direction_bucket(angle, self.buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_angles() -> Vec<f32> {
        (0..500).map(|i| -12.0 + i as f32 * 0.0517).collect()
    }

    #[test]
    fn bucket_is_periodic_and_in_range() {
        for n in [1usize, 7, 8, 64, 100] {
            let width = TAU / n as f32;
            for a in sample_angles() {
                let pos = a / width + 0.5;
                if (pos - pos.round()).abs() < 1e-3 {
                    // f32 rounding of `a + TAU` may cross a boundary here
                    continue;
                }
                let b = direction_bucket(a, n);
                assert!(b < n, "bucket {b} out of range for n={n}");
                assert_eq!(b, direction_bucket(a + TAU, n), "angle={a} n={n}");
            }
        }
    }

    #[test]
    fn bucket_zero_is_centered_on_zero() {
        let q = DirectionQuantizer::default();
        let w = q.bucket_width();
        let eps = 1e-3;
        assert_eq!(q.bucket(0.0), 0);
        assert_eq!(q.bucket(w / 2.0 - eps), 0);
        assert_eq!(q.bucket(w / 2.0 + eps), 1);
        assert_eq!(q.bucket(-w / 2.0 + eps), 0);
        assert_eq!(q.bucket(-w / 2.0 - eps), 63);
        assert_eq!(q.bucket(TAU - w / 2.0 - eps), 63);
    }

    #[test]
    fn non_finite_angles_fall_into_bucket_zero() {
        assert_eq!(direction_bucket(f32::NAN, 64), 0);
        assert_eq!(direction_bucket(f32::INFINITY, 64), 0);
    }

    #[test]
    fn zero_buckets_rejected() {
        assert!(DirectionQuantizer::new(0).is_none());
        assert_eq!(DirectionQuantizer::new(16).map(|q| q.buckets()), Some(16));
    }

    #[test]
    fn wrap_two_pi_range() {
        assert_eq!(wrap_two_pi(0.0), 0.0);
        assert!((wrap_two_pi(-std::f32::consts::FRAC_PI_2) - 1.5 * std::f32::consts::PI).abs() < 1e-5);
        assert!(wrap_two_pi(TAU) < 1e-5);
        assert!(wrap_two_pi(-1e-9) < TAU);
    }
}
