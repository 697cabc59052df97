//! Edge extraction producing the `EdgeMap` consumed by learning and voting.
//!
//! - Gradient computation (Sobel/Scharr) on intensities in [0, 255] returning
//!   `gx`, `gy`, and magnitude.
//! - Direction-aligned non-maximum suppression that thins ridges to one pixel
//!   and zeroes every suppressed magnitude.
//!
//! Borders are handled by clamping in the gradient pass; the outermost
//! 1-pixel frame is always suppressed.

pub mod grad;
pub mod map;
pub mod nms;

pub use grad::{image_gradients, GradientKernel, Grad};
pub use map::EdgeMap;
pub use nms::suppress_non_maxima;

use crate::image::{ImageF32, ImageU8};
use log::debug;
use serde::Deserialize;

/// Parameters of the edge extraction stage.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EdgeOptions {
    /// Derivative kernel used for the gradient pass.
    pub kernel: GradientKernel,
    /// Gradient magnitudes below this value are dropped before thinning.
    pub magnitude_threshold: f32,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            kernel: GradientKernel::Sobel,
            magnitude_threshold: 16.0,
        }
    }
}

/// Compute a thinned edge map from a float intensity image.
pub fn detect_edge_map(l: &ImageF32, options: &EdgeOptions) -> EdgeMap {
    let grad = image_gradients(l, options.kernel);
    let edges = suppress_non_maxima(&grad, options.magnitude_threshold);
    debug!(
        "edges: {}x{} kernel={:?} thresh={:.2} -> {} edge pixels",
        l.w,
        l.h,
        options.kernel,
        options.magnitude_threshold,
        edges.edge_count()
    );
    edges
}

/// Convenience wrapper converting an 8-bit view to intensity units first.
pub fn detect_edge_map_u8(gray: &ImageU8<'_>, options: &EdgeOptions) -> EdgeMap {
    detect_edge_map(&ImageF32::from_u8_intensity(gray), options)
}
