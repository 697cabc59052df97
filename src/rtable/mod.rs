//! R-table: per-direction lists of displacements from edge pixels to the
//! learned reference point.
//!
//! Bucket keys are bounded by the quantizer, so the table is an indexed array
//! of `N` vectors rather than a map. The table carries its own quantizer and
//! is read-only once built.

pub mod builder;
pub mod persist;

pub use builder::{learn, shape_centroid};
pub use persist::{load, load_file, save, save_file};

use crate::angle::DirectionQuantizer;
use crate::error::{GhtError, Result};
use serde::Serialize;

/// Integer displacement `centroid - edge_pixel`, truncated toward zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Displacement {
    pub rx: i32,
    pub ry: i32,
}

impl Displacement {
    pub const fn new(rx: i32, ry: i32) -> Self {
        Self { rx, ry }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RTable {
    quantizer: DirectionQuantizer,
    centroid: [f32; 2],
    buckets: Vec<Vec<Displacement>>,
}

impl RTable {
    /// Assemble a table from explicit buckets.
    ///
    /// `buckets.len()` must equal the quantizer's bucket count and the
    /// centroid must be finite.
    pub fn from_parts(
        quantizer: DirectionQuantizer,
        centroid: [f32; 2],
        buckets: Vec<Vec<Displacement>>,
    ) -> Result<Self> {
        if buckets.len() != quantizer.buckets() {
            return Err(GhtError::InvalidInput(format!(
                "r-table has {} buckets, quantizer expects {}",
                buckets.len(),
                quantizer.buckets()
            )));
        }
        if !centroid.iter().all(|c| c.is_finite()) {
            return Err(GhtError::InvalidInput(format!(
                "r-table centroid must be finite, got {centroid:?}"
            )));
        }
        Ok(Self {
            quantizer,
            centroid,
            buckets,
        })
    }

    /// Quantizer used at learning time; voting must use the same one.
    pub fn quantizer(&self) -> DirectionQuantizer {
        self.quantizer
    }

    /// Magnitude-weighted centroid of the reference shape, `[x, y]`.
    pub fn centroid(&self) -> [f32; 2] {
        self.centroid
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Displacements recorded for `bucket`; empty when out of range.
    #[inline]
    pub fn bucket(&self, bucket: usize) -> &[Displacement] {
        self.buckets.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn buckets(&self) -> &[Vec<Displacement>] {
        &self.buckets
    }

    /// Total number of displacement vectors across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Size of the largest bucket; bounds the per-pixel voting cost.
    pub fn max_bucket_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}
