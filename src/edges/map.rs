//! Read-only per-pixel gradient magnitude and direction grid.
use crate::angle::wrap_two_pi;
use crate::error::{GhtError, Result};
use crate::image::ImageF32;

/// Edge map consumed by r-table learning and voting.
///
/// Magnitudes are non-negative; angles are stored wrapped into [0, 2π).
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeMap {
    magnitude: ImageF32,
    angle: ImageF32,
}

impl EdgeMap {
    /// Build an edge map from same-shaped magnitude and angle grids.
    ///
    /// Angles are wrapped into [0, 2π); negative or non-finite magnitudes
    /// are rejected.
    pub fn new(magnitude: ImageF32, mut angle: ImageF32) -> Result<Self> {
        if magnitude.w != angle.w || magnitude.h != angle.h {
            return Err(GhtError::InvalidInput(format!(
                "edge map grids differ in shape: magnitude {}x{}, angle {}x{}",
                magnitude.w, magnitude.h, angle.w, angle.h
            )));
        }
        if let Some(bad) = magnitude.data.iter().find(|m| !(m.is_finite() && **m >= 0.0)) {
            return Err(GhtError::InvalidInput(format!(
                "edge magnitude must be finite and non-negative, got {bad}"
            )));
        }
        for a in &mut angle.data {
            *a = wrap_two_pi(*a);
        }
        Ok(Self { magnitude, angle })
    }

    /// Build an edge map by evaluating `f(x, y) -> (magnitude, angle)` per pixel.
    pub fn from_fn<F>(w: usize, h: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> (f32, f32),
    {
        let mut magnitude = ImageF32::new(w, h);
        let mut angle = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let (m, a) = f(x, y);
                magnitude.set(x, y, m);
                angle.set(x, y, a);
            }
        }
        Self::new(magnitude, angle)
    }

    /// All-zero edge map of the given size.
    pub fn empty(w: usize, h: usize) -> Self {
        Self {
            magnitude: ImageF32::new(w, h),
            angle: ImageF32::new(w, h),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.magnitude.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.magnitude.h
    }

    #[inline]
    pub fn magnitude(&self, x: usize, y: usize) -> f32 {
        self.magnitude.get(x, y)
    }

    /// Gradient direction in [0, 2π).
    #[inline]
    pub fn angle(&self, x: usize, y: usize) -> f32 {
        self.angle.get(x, y)
    }

    pub fn magnitudes(&self) -> &ImageF32 {
        &self.magnitude
    }

    pub fn angles(&self) -> &ImageF32 {
        &self.angle
    }

    /// Sum of all magnitudes.
    pub fn total_magnitude(&self) -> f64 {
        self.magnitude.data.iter().map(|&m| m as f64).sum()
    }

    /// Number of pixels with strictly positive magnitude.
    pub fn edge_count(&self) -> usize {
        self.magnitude.data.iter().filter(|&&m| m > 0.0).count()
    }

    /// Iterate `(x, y, magnitude, angle)` in row-major order over pixels with
    /// strictly positive magnitude.
    pub fn edge_pixels(&self) -> impl Iterator<Item = (usize, usize, f32, f32)> + '_ {
        self.scan(|m| m > 0.0)
    }

    /// Iterate `(x, y, magnitude, angle)` in row-major order over pixels whose
    /// magnitude is at least `min_magnitude`.
    pub fn pixels_at_least(
        &self,
        min_magnitude: f32,
    ) -> impl Iterator<Item = (usize, usize, f32, f32)> + '_ {
        self.scan(move |m| m >= min_magnitude)
    }

    fn scan<P>(&self, keep: P) -> impl Iterator<Item = (usize, usize, f32, f32)> + '_
    where
        P: Fn(f32) -> bool + 'static,
    {
        let w = self.width();
        self.magnitude
            .data
            .iter()
            .zip(self.angle.data.iter())
            .enumerate()
            .filter(move |&(_, (&m, _))| keep(m))
            .map(move |(i, (&m, &a))| (i % w, i / w, m, a))
    }
}
