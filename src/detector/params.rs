//! Parameters configuring learning and detection.
//!
//! Defaults reproduce the classic setup: 64 direction buckets, six octave
//! scales from 1/8 to 4, 64 rotation steps, unit vote threshold, σ = 2
//! smoothing, and the ten strongest peaks at least two cells apart.
use crate::accumulator::{default_scales, PoseSpace};
use crate::angle::{DirectionQuantizer, DEFAULT_DIRECTION_BUCKETS};
use crate::edges::EdgeOptions;
use crate::error::{GhtError, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GhtParams {
    /// Gradient direction buckets of the r-table used when learning.
    pub direction_buckets: usize,
    /// Scale factors searched during voting, in accumulator order.
    pub scales: Vec<f64>,
    /// Number of rotation offsets, uniformly spaced over [0, 2π).
    pub rotation_steps: usize,
    /// Query pixels weaker than this do not vote at all.
    pub min_vote_magnitude: f32,
    /// Gaussian sigma applied on all accumulator axes; 0 disables smoothing.
    pub smoothing_sigma: f64,
    /// Minimum per-axis index distance between reported peaks.
    pub min_separation: usize,
    /// Upper bound on reported candidates.
    pub max_candidates: usize,
    /// Edge extraction used by the image-level helpers and binaries.
    pub edges: EdgeOptions,
}

impl Default for GhtParams {
    fn default() -> Self {
        Self {
            direction_buckets: DEFAULT_DIRECTION_BUCKETS,
            scales: default_scales(),
            rotation_steps: 64,
            min_vote_magnitude: 1.0,
            smoothing_sigma: 2.0,
            min_separation: 2,
            max_candidates: 10,
            edges: EdgeOptions::default(),
        }
    }
}

impl GhtParams {
    pub fn validate(&self) -> Result<()> {
        if self.direction_buckets == 0 {
            return Err(GhtError::InvalidInput(
                "direction_buckets must be positive".to_string(),
            ));
        }
        if self.scales.is_empty() {
            return Err(GhtError::InvalidInput("scales must not be empty".to_string()));
        }
        if let Some(s) = self.scales.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(GhtError::InvalidInput(format!(
                "scales must be finite and positive, got {s}"
            )));
        }
        if self.rotation_steps == 0 {
            return Err(GhtError::InvalidInput(
                "rotation_steps must be positive".to_string(),
            ));
        }
        if !self.min_vote_magnitude.is_finite() {
            return Err(GhtError::InvalidInput(
                "min_vote_magnitude must be finite".to_string(),
            ));
        }
        if !(self.smoothing_sigma.is_finite() && self.smoothing_sigma >= 0.0) {
            return Err(GhtError::InvalidInput(format!(
                "smoothing_sigma must be finite and non-negative, got {}",
                self.smoothing_sigma
            )));
        }
        Ok(())
    }

    pub fn quantizer(&self) -> Option<DirectionQuantizer> {
        DirectionQuantizer::new(self.direction_buckets)
    }

    pub fn pose_space(&self) -> PoseSpace {
        PoseSpace::new(self.scales.clone(), self.rotation_steps)
    }
}
