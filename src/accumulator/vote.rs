//! Voting pass: replay the r-table over a query edge map.
//!
//! For every query pixel with magnitude at or above the vote threshold and
//! every rotation offset `rot`:
//! - look up the bucket of `(angle + rot) mod 2π`,
//! - rotate each stored displacement by `rot`,
//! - for every scale `s`, vote for `trunc((x, y) + s · r_rot)` when it lies
//!   inside the image. Out-of-bounds votes are dropped.
//!
//! Work is O(pixels × rotations × bucket size × scales). Each rotation writes
//! only its own slab; with the `parallel` feature slabs are filled by rayon.
use super::{Accumulator, PoseSpace};
use crate::edges::EdgeMap;
use crate::rtable::RTable;
use log::{debug, warn};
use nalgebra::{Rotation2, Vector2};
use std::f64::consts::TAU;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Observer receiving completion percentages in `[0, 100]`.
///
/// Purely observational; may be called from several worker threads.
pub trait Progress: Sync {
    fn report(&self, percent: f32);
}

impl<F> Progress for F
where
    F: Fn(f32) + Sync,
{
    fn report(&self, percent: f32) {
        self(percent)
    }
}

#[derive(Clone, Copy)]
struct QueryPixel {
    x: usize,
    y: usize,
    angle: f32,
}

/// Fill a fresh accumulator with the votes of `query` against `rtable`.
pub fn vote(
    rtable: &RTable,
    query: &EdgeMap,
    space: &PoseSpace,
    min_magnitude: f32,
    progress: &dyn Progress,
) -> Accumulator {
    let (w, h) = (query.width(), query.height());
    let mut acc = space.accumulator(w, h);
    let slab_len = acc.rotation_slab_len();
    if slab_len == 0 || space.rotations().is_empty() {
        progress.report(100.0);
        return acc;
    }

    let pixels: Vec<QueryPixel> = query
        .pixels_at_least(min_magnitude)
        .map(|(x, y, _, angle)| QueryPixel { x, y, angle })
        .collect();
    if pixels.is_empty() {
        warn!("vote: no query pixels with magnitude >= {min_magnitude}");
    }

    let total = space.rotations().len();
    let done = AtomicUsize::new(0);
    let fill = |(k, slab): (usize, &mut [f32])| {
        vote_rotation(rtable, &pixels, space, k, w, h, slab);
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        progress.report(100.0 * finished as f32 / total as f32);
    };

    #[cfg(feature = "parallel")]
    acc.as_mut_slice()
        .par_chunks_mut(slab_len)
        .enumerate()
        .for_each(fill);
    #[cfg(not(feature = "parallel"))]
    acc.as_mut_slice()
        .chunks_mut(slab_len)
        .enumerate()
        .for_each(fill);

    debug!(
        "vote: {} query pixels, {} rotations x {} scales, {:.0} in-bounds votes",
        pixels.len(),
        total,
        space.scales().len(),
        acc.total()
    );
    acc
}

/// Cast all votes for rotation `k` into its slab (layout: scale, y, x).
fn vote_rotation(
    rtable: &RTable,
    pixels: &[QueryPixel],
    space: &PoseSpace,
    k: usize,
    w: usize,
    h: usize,
    slab: &mut [f32],
) {
    let quantizer = rtable.quantizer();
    let rot = space.rotations()[k];
    let rotation = Rotation2::new(rot);
    let plane = w * h;

    for p in pixels {
        let alpha = (p.angle as f64 + rot).rem_euclid(TAU);
        for d in rtable.bucket(quantizer.bucket(alpha as f32)) {
            let r = rotation * Vector2::new(d.rx as f64, d.ry as f64);
            for (si, &s) in space.scales().iter().enumerate() {
                // truncate after scaling and rotation, before the bounds check
                let cx = (p.x as f64 + s * r.x) as i64;
                let cy = (p.y as f64 + s * r.y) as i64;
                if cx < 0 || cy < 0 || cx >= w as i64 || cy >= h as i64 {
                    continue;
                }
                slab[si * plane + cy as usize * w + cx as usize] += 1.0;
            }
        }
    }
}
