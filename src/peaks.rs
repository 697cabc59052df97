//! Peak extraction: top-K separated local maxima of the accumulator.
//!
//! A cell is a local maximum when it equals the maximum of the hypercube of
//! half-width `min_distance` around it (edge samples repeated) and exceeds
//! the accumulator minimum, so flat accumulators have no peaks. Maxima are
//! visited in descending value, ties in storage order, and greedily kept
//! unless an accepted peak is closer than `min_distance` on all four axes
//! (Chebyshev distance below `min_distance`).
use crate::accumulator::{AccIndex, Accumulator, PoseSpace};
use crate::filters::maximum_filter;
use crate::types::Candidate;
use log::debug;

/// Indices of at most `max_peaks` separated local maxima, strongest first.
pub fn find_peaks(acc: &Accumulator, min_distance: usize, max_peaks: usize) -> Vec<AccIndex> {
    if acc.is_empty() || max_peaks == 0 {
        return Vec::new();
    }
    let floor = acc.min_value();
    let maxed = maximum_filter(acc, min_distance);

    let values = acc.as_slice();
    let mut maxima: Vec<usize> = values
        .iter()
        .zip(maxed.as_slice())
        .enumerate()
        .filter(|&(_, (&v, &m))| v > floor && v == m)
        .map(|(i, _)| i)
        .collect();
    // stable: equal values keep storage order
    maxima.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut accepted: Vec<AccIndex> = Vec::with_capacity(max_peaks.min(maxima.len()));
    for flat in maxima {
        let idx = acc.unravel(flat);
        if accepted
            .iter()
            .all(|kept| kept.chebyshev(&idx) >= min_distance)
        {
            accepted.push(idx);
            if accepted.len() == max_peaks {
                break;
            }
        }
    }
    debug!(
        "peaks: kept {} (min_distance={min_distance}, max={max_peaks})",
        accepted.len()
    );
    accepted
}

/// Map separated peaks back to poses through `space`.
pub fn extract(
    acc: &Accumulator,
    space: &PoseSpace,
    min_separation: usize,
    max_candidates: usize,
) -> Vec<Candidate> {
    find_peaks(acc, min_separation, max_candidates)
        .into_iter()
        .map(|index| Candidate {
            scale: space.scales()[index.scale],
            rotation: space.rotations()[index.rotation],
            x: index.x,
            y: index.y,
            score: acc.at(index),
            index,
        })
        .collect()
}
