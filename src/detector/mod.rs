//! High-level detector wiring learning, voting, smoothing, and peak search.
//!
//! `GhtDetector` owns the fixed pose tables (scales, rotations) and the
//! learning quantizer. Detection always indexes the r-table with the
//! quantizer stored in the table itself.

mod params;

pub use params::GhtParams;

use crate::accumulator::{vote, PoseSpace, Progress};
use crate::angle::DirectionQuantizer;
use crate::diagnostics::TimingBreakdown;
use crate::edges::{detect_edge_map_u8, EdgeMap};
use crate::error::{GhtError, Result};
use crate::filters::gaussian_smooth;
use crate::image::ImageU8;
use crate::peaks;
use crate::rtable::{self, RTable};
use crate::types::Detection;
use log::{debug, warn};
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct GhtDetector {
    params: GhtParams,
    space: PoseSpace,
    quantizer: DirectionQuantizer,
}

impl Default for GhtDetector {
    fn default() -> Self {
        let params = GhtParams::default();
        Self {
            space: params.pose_space(),
            quantizer: DirectionQuantizer::default(),
            params,
        }
    }
}

impl GhtDetector {
    /// Validate `params` and build the pose tables.
    pub fn new(params: GhtParams) -> Result<Self> {
        params.validate()?;
        let quantizer = params.quantizer().ok_or_else(|| {
            GhtError::InvalidInput("direction_buckets must be positive".to_string())
        })?;
        Ok(Self {
            space: params.pose_space(),
            quantizer,
            params,
        })
    }

    pub fn params(&self) -> &GhtParams {
        &self.params
    }

    pub fn pose_space(&self) -> &PoseSpace {
        &self.space
    }

    /// Thinned edge map of an 8-bit image using the configured edge options.
    pub fn edge_map(&self, gray: &ImageU8<'_>) -> EdgeMap {
        detect_edge_map_u8(gray, &self.params.edges)
    }

    /// Learn an r-table from the edge map of a reference shape.
    pub fn learn(&self, shape: &EdgeMap) -> Result<RTable> {
        rtable::learn(shape, self.quantizer)
    }

    /// Detect edges in `gray`, then learn from them.
    pub fn learn_image(&self, gray: &ImageU8<'_>) -> Result<RTable> {
        self.learn(&self.edge_map(gray))
    }

    pub fn detect(&self, rtable: &RTable, query: &EdgeMap) -> Detection {
        self.detect_with_progress(rtable, query, &|_: f32| {})
    }

    /// Detect edges in `gray`, then run detection on them.
    pub fn detect_image(&self, rtable: &RTable, gray: &ImageU8<'_>) -> Detection {
        self.detect(rtable, &self.edge_map(gray))
    }

    /// Vote, smooth, and extract candidates, reporting vote progress.
    pub fn detect_with_progress(
        &self,
        rtable: &RTable,
        query: &EdgeMap,
        progress: &dyn Progress,
    ) -> Detection {
        if rtable.quantizer() != self.quantizer {
            warn!(
                "detect: r-table uses {} direction buckets, configured {}; using the table's",
                rtable.bucket_count(),
                self.quantizer.buckets()
            );
        }
        let mut timings = TimingBreakdown::default();

        let start = Instant::now();
        let raw = vote(
            rtable,
            query,
            &self.space,
            self.params.min_vote_magnitude,
            progress,
        );
        let votes = raw.total();
        timings.push("vote", start.elapsed().as_secs_f64() * 1000.0);

        let start = Instant::now();
        let accumulator = gaussian_smooth(&raw, self.params.smoothing_sigma);
        drop(raw);
        timings.push("smooth", start.elapsed().as_secs_f64() * 1000.0);

        let start = Instant::now();
        let candidates = peaks::extract(
            &accumulator,
            &self.space,
            self.params.min_separation,
            self.params.max_candidates,
        );
        timings.push("peaks", start.elapsed().as_secs_f64() * 1000.0);

        debug!(
            "detect: {}x{} votes={votes:.0} candidates={} in {:.1} ms",
            query.width(),
            query.height(),
            candidates.len(),
            timings.total_ms
        );
        Detection {
            accumulator,
            candidates,
            votes,
            timings,
        }
    }
}
