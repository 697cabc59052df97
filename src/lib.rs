#![doc = include_str!("../README.md")]

// Core pipeline
pub mod accumulator;
pub mod angle;
pub mod detector;
pub mod filters;
pub mod peaks;
pub mod rtable;
pub mod types;

// Edge extraction, images, persistence helpers
pub mod config;
pub mod diagnostics;
pub mod edges;
pub mod error;
pub mod image;

// --- High-level re-exports -------------------------------------------------

pub use crate::accumulator::{AccIndex, Accumulator, PoseSpace, Progress};
pub use crate::angle::DirectionQuantizer;
pub use crate::detector::{GhtDetector, GhtParams};
pub use crate::edges::EdgeMap;
pub use crate::error::{GhtError, Result};
pub use crate::rtable::{Displacement, RTable};
pub use crate::types::{Candidate, Detection, DetectionReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use ght_detector::prelude::*;
///
/// # fn main() -> Result<(), GhtError> {
/// let (w, h) = (64usize, 64usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let det = GhtDetector::new(GhtParams::default())?;
/// let table = det.learn_image(&img)?;
/// let detection = det.detect_image(&table, &img);
/// for c in &detection.candidates {
///     println!("scale={} rot={:.3} at ({}, {})", c.scale, c.rotation, c.x, c.y);
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{Candidate, EdgeMap, GhtDetector, GhtError, GhtParams, RTable};
}
