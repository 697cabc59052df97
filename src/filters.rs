//! Separable 1-D filters applied along accumulator axes.
//!
//! Smoothing runs a normalized Gaussian along each of the four axes in turn;
//! the local-maximum test runs a running maximum the same way. A separable
//! run allocates exactly one output accumulator: the rotation pass reads the
//! input and fills it, then the scale, x, and y passes rewrite it in place,
//! one line at a time. Rotation slabs are independent in every pass, so they
//! are processed in parallel when the `parallel` feature is enabled.
use crate::accumulator::{Accumulator, Axis};
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Gaussian footprint half-width in units of sigma.
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// How samples beyond either end of an axis are synthesized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Border {
    /// Mirror including the edge sample: `d c b a | a b c d | d c b a`.
    Reflect,
    /// Repeat the edge sample: `a a a a | a b c d | d d d d`.
    Nearest,
}

impl Border {
    /// Map a possibly out-of-range coordinate onto `[0, len)`.
    #[inline]
    pub fn resolve(self, coord: isize, len: usize) -> usize {
        let n = len as isize;
        match self {
            Border::Nearest => coord.clamp(0, n - 1) as usize,
            Border::Reflect => {
                let m = coord.rem_euclid(2 * n);
                if m < n {
                    m as usize
                } else {
                    (2 * n - 1 - m) as usize
                }
            }
        }
    }
}

/// A symmetric 1-D filter with a fixed footprint of `2 * radius + 1` samples.
pub trait SeparableFilter: Sync {
    fn radius(&self) -> usize;
    fn border(&self) -> Border;
    /// Combine one footprint window, ordered from low to high coordinate.
    fn reduce(&self, window: &[f32]) -> f32;
}

/// Normalized sampled Gaussian, truncated at `GAUSSIAN_TRUNCATE · sigma`.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianFilter {
    taps: Vec<f32>,
}

impl GaussianFilter {
    /// Returns `None` for non-positive or non-finite sigma.
    pub fn new(sigma: f64) -> Option<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return None;
        }
        let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
        let weights: Vec<f64> = (-radius..=radius)
            .map(|i| (-0.5 * (i as f64 / sigma).powi(2)).exp())
            .collect();
        let sum: f64 = weights.iter().sum();
        Some(Self {
            taps: weights.iter().map(|w| (w / sum) as f32).collect(),
        })
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }
}

impl SeparableFilter for GaussianFilter {
    fn radius(&self) -> usize {
        self.taps.len() / 2
    }

    fn border(&self) -> Border {
        Border::Reflect
    }

    #[inline]
    fn reduce(&self, window: &[f32]) -> f32 {
        window.iter().zip(&self.taps).map(|(v, t)| v * t).sum()
    }
}

/// Running maximum over a window of `2 * radius + 1` samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaximumFilter {
    pub radius: usize,
}

impl SeparableFilter for MaximumFilter {
    fn radius(&self) -> usize {
        self.radius
    }

    fn border(&self) -> Border {
        Border::Nearest
    }

    #[inline]
    fn reduce(&self, window: &[f32]) -> f32 {
        window.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Apply `filter` along one axis, returning a new accumulator.
pub fn apply_along_axis<F>(input: &Accumulator, axis: Axis, filter: &F) -> Accumulator
where
    F: SeparableFilter + ?Sized,
{
    let mut out = input.zeros_like();
    let slab_len = input.rotation_slab_len();
    if input.is_empty() || slab_len == 0 {
        return out;
    }

    let len = input.axis_len(axis);
    let stride = input.axis_stride(axis);
    let radius = filter.radius() as isize;
    let border = filter.border();
    let src = input.as_slice();

    let fill = |(r, dst_slab): (usize, &mut [f32])| {
        let mut window = vec![0.0f32; 2 * radius as usize + 1];
        for (local, dst) in dst_slab.iter_mut().enumerate() {
            let flat = r * slab_len + local;
            let coord = input.axis_coord(flat, axis);
            let base = flat - coord * stride;
            for (k, sample) in window.iter_mut().enumerate() {
                let c = border.resolve(coord as isize + k as isize - radius, len);
                *sample = src[base + c * stride];
            }
            *dst = filter.reduce(&window);
        }
    };

    #[cfg(feature = "parallel")]
    out.as_mut_slice()
        .par_chunks_mut(slab_len)
        .enumerate()
        .for_each(fill);
    #[cfg(not(feature = "parallel"))]
    out.as_mut_slice()
        .chunks_mut(slab_len)
        .enumerate()
        .for_each(fill);

    out
}

/// Apply `filter` along every axis.
///
/// Peak memory is `input` plus the returned accumulator. Axis order does not
/// change the result beyond float rounding: the passes are independent.
pub fn apply_separable<F>(input: &Accumulator, filter: &F) -> Accumulator
where
    F: SeparableFilter + ?Sized,
{
    let mut out = apply_along_axis(input, Axis::Rotation, filter);
    for axis in [Axis::Scale, Axis::X, Axis::Y] {
        filter_within_slabs(&mut out, axis, filter);
    }
    out
}

/// In-place pass along an axis that lies inside a rotation slab.
fn filter_within_slabs<F>(acc: &mut Accumulator, axis: Axis, filter: &F)
where
    F: SeparableFilter + ?Sized,
{
    debug_assert!(axis != Axis::Rotation, "rotation lines cross slabs");
    let slab_len = acc.rotation_slab_len();
    if acc.is_empty() || slab_len == 0 {
        return;
    }

    // slab layout (scale, y, x) shares the global strides of these axes
    let len = acc.axis_len(axis);
    let stride = acc.axis_stride(axis);
    let radius = filter.radius() as isize;
    let border = filter.border();

    let fill = |slab: &mut [f32]| {
        let mut line = vec![0.0f32; len];
        let mut window = vec![0.0f32; 2 * radius as usize + 1];
        for start in 0..slab.len() {
            if (start / stride) % len != 0 {
                continue;
            }
            for (c, v) in line.iter_mut().enumerate() {
                *v = slab[start + c * stride];
            }
            for c in 0..len {
                for (k, sample) in window.iter_mut().enumerate() {
                    *sample = line[border.resolve(c as isize + k as isize - radius, len)];
                }
                slab[start + c * stride] = filter.reduce(&window);
            }
        }
    };

    #[cfg(feature = "parallel")]
    acc.as_mut_slice().par_chunks_mut(slab_len).for_each(fill);
    #[cfg(not(feature = "parallel"))]
    acc.as_mut_slice().chunks_mut(slab_len).for_each(fill);
}

/// Separable Gaussian blur over all four axes.
///
/// A non-positive `sigma` returns an unmodified copy.
pub fn gaussian_smooth(acc: &Accumulator, sigma: f64) -> Accumulator {
    match GaussianFilter::new(sigma) {
        Some(filter) => {
            debug!(
                "smooth: sigma={sigma:.2} taps={} cells={}",
                filter.taps().len(),
                acc.len()
            );
            apply_separable(acc, &filter)
        }
        None => acc.clone(),
    }
}

/// Maximum over the hypercube of half-width `radius` around every cell.
pub fn maximum_filter(acc: &Accumulator, radius: usize) -> Accumulator {
    if radius == 0 {
        return acc.clone();
    }
    apply_separable(acc, &MaximumFilter { radius })
}
