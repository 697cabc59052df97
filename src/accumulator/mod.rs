//! 4-D vote accumulator over (scale, rotation, x, y).
//!
//! Storage is rotation-major: one contiguous slab of `scales × height × width`
//! cells per rotation offset. Voting and the separable filters hand out whole
//! slabs to workers, so every cell has a single writer.

pub mod vote;

pub use vote::{vote, Progress};

use crate::image::ImageF32;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Discretized pose parameters spanned by the accumulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseSpace {
    scales: Vec<f64>,
    rotations: Vec<f64>,
}

impl Default for PoseSpace {
    /// Scales `2^-3 ..= 2^2`, rotations in 64 steps of π/32.
    fn default() -> Self {
        Self::new(default_scales(), 64)
    }
}

/// `{0.125, 0.25, 0.5, 1, 2, 4}`
pub fn default_scales() -> Vec<f64> {
    (-3..3).map(|e| 2f64.powi(e)).collect()
}

impl PoseSpace {
    /// Scales in the given order; `rotation_steps` offsets uniformly over [0, 2π).
    pub fn new(scales: Vec<f64>, rotation_steps: usize) -> Self {
        let step = if rotation_steps > 0 {
            TAU / rotation_steps as f64
        } else {
            0.0
        };
        let rotations = (0..rotation_steps).map(|i| i as f64 * step).collect();
        Self { scales, rotations }
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn rotations(&self) -> &[f64] {
        &self.rotations
    }

    /// Zero-filled accumulator for a `width × height` query.
    pub fn accumulator(&self, width: usize, height: usize) -> Accumulator {
        Accumulator::zeros(self.scales.len(), self.rotations.len(), width, height)
    }
}

/// Position of one accumulator cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccIndex {
    pub scale: usize,
    pub rotation: usize,
    pub x: usize,
    pub y: usize,
}

impl AccIndex {
    pub const fn new(scale: usize, rotation: usize, x: usize, y: usize) -> Self {
        Self {
            scale,
            rotation,
            x,
            y,
        }
    }

    /// Largest per-axis index distance (Chebyshev distance in index space).
    pub fn chebyshev(&self, other: &AccIndex) -> usize {
        self.scale
            .abs_diff(other.scale)
            .max(self.rotation.abs_diff(other.rotation))
            .max(self.x.abs_diff(other.x))
            .max(self.y.abs_diff(other.y))
    }
}

/// Accumulator axes in index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Scale,
    Rotation,
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::Scale, Axis::Rotation, Axis::X, Axis::Y];
}

#[derive(Clone, Debug, PartialEq)]
pub struct Accumulator {
    scales: usize,
    rotations: usize,
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Accumulator {
    pub fn zeros(scales: usize, rotations: usize, width: usize, height: usize) -> Self {
        Self {
            scales,
            rotations,
            width,
            height,
            data: vec![0.0; scales * rotations * width * height],
        }
    }

    /// Same shape as `self`, all zeros.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.scales, self.rotations, self.width, self.height)
    }

    /// `[scales, rotations, width, height]`
    pub fn shape(&self) -> [usize; 4] {
        [self.scales, self.rotations, self.width, self.height]
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn axis_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Scale => self.scales,
            Axis::Rotation => self.rotations,
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Distance in `data` between neighbouring cells along `axis`.
    #[inline]
    pub fn axis_stride(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => 1,
            Axis::Y => self.width,
            Axis::Scale => self.width * self.height,
            Axis::Rotation => self.rotation_slab_len(),
        }
    }

    /// Coordinate of flat cell `flat` along `axis`.
    #[inline]
    pub fn axis_coord(&self, flat: usize, axis: Axis) -> usize {
        (flat / self.axis_stride(axis)) % self.axis_len(axis)
    }

    /// Cells per rotation offset.
    #[inline]
    pub fn rotation_slab_len(&self) -> usize {
        self.scales * self.width * self.height
    }

    #[inline]
    pub fn flat_index(&self, idx: AccIndex) -> usize {
        ((idx.rotation * self.scales + idx.scale) * self.height + idx.y) * self.width + idx.x
    }

    #[inline]
    pub fn unravel(&self, flat: usize) -> AccIndex {
        AccIndex {
            scale: self.axis_coord(flat, Axis::Scale),
            rotation: self.axis_coord(flat, Axis::Rotation),
            x: self.axis_coord(flat, Axis::X),
            y: self.axis_coord(flat, Axis::Y),
        }
    }

    #[inline]
    pub fn get(&self, scale: usize, rotation: usize, x: usize, y: usize) -> f32 {
        self.data[self.flat_index(AccIndex::new(scale, rotation, x, y))]
    }

    #[inline]
    pub fn at(&self, idx: AccIndex) -> f32 {
        self.data[self.flat_index(idx)]
    }

    /// Raw cells in storage order (rotation, scale, y, x).
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Sum of all cells.
    pub fn total(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    pub fn min_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// 2-D projection summed over the scale and rotation axes.
    pub fn project_xy(&self) -> ImageF32 {
        let mut out = ImageF32::new(self.width, self.height);
        let plane = self.width * self.height;
        if plane == 0 {
            return out;
        }
        for slice in self.data.chunks_exact(plane) {
            for (dst, &v) in out.data.iter_mut().zip(slice) {
                *dst += v;
            }
        }
        out
    }
}
