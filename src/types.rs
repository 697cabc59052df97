use crate::accumulator::{AccIndex, Accumulator};
use crate::diagnostics::TimingBreakdown;
use serde::Serialize;

/// Hypothesized pose of the learned shape's reference point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub scale: f64,
    /// Rotation offset in radians, [0, 2π).
    pub rotation: f64,
    pub x: usize,
    pub y: usize,
    /// Smoothed accumulator value at the peak.
    pub score: f32,
    /// Accumulator cell the candidate was read from.
    pub index: AccIndex,
}

/// Output of a detection run.
#[derive(Clone, Debug)]
pub struct Detection {
    /// Smoothed accumulator, indexed (scale, rotation, x, y).
    pub accumulator: Accumulator,
    /// Candidates in non-increasing score order.
    pub candidates: Vec<Candidate>,
    /// Number of in-bounds votes cast before smoothing.
    pub votes: f64,
    pub timings: TimingBreakdown,
}

/// Serializable summary of a detection without the accumulator payload.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub width: usize,
    pub height: usize,
    pub votes: f64,
    pub candidates: Vec<Candidate>,
    pub timings: TimingBreakdown,
}

impl Detection {
    pub fn report(&self) -> DetectionReport {
        let [_, _, width, height] = self.accumulator.shape();
        DetectionReport {
            width,
            height,
            votes: self.votes,
            candidates: self.candidates.clone(),
            timings: self.timings.clone(),
        }
    }
}
