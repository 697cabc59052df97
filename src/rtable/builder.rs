//! Learning: build an r-table from the edge map of a reference shape.
use super::{Displacement, RTable};
use crate::angle::DirectionQuantizer;
use crate::edges::EdgeMap;
use crate::error::{GhtError, Result};
use log::debug;

/// Magnitude-weighted mean position `[x, y]` of all edge pixels, or `None`
/// when the total magnitude is zero.
pub fn shape_centroid(shape: &EdgeMap) -> Option<[f64; 2]> {
    let mut sum = 0.0f64;
    let mut sx = 0.0f64;
    let mut sy = 0.0f64;
    for (x, y, mag, _) in shape.edge_pixels() {
        let m = mag as f64;
        sum += m;
        sx += m * x as f64;
        sy += m * y as f64;
    }
    (sum > 0.0).then(|| [sx / sum, sy / sum])
}

/// Learn an r-table from `shape`.
///
/// Every pixel with positive magnitude contributes exactly one displacement
/// `trunc(centroid - (x, y))` to the bucket of its gradient direction, in
/// row-major scan order.
pub fn learn(shape: &EdgeMap, quantizer: DirectionQuantizer) -> Result<RTable> {
    let [cx, cy] = shape_centroid(shape).ok_or(GhtError::EmptyShape)?;
    debug!("r-table: centroid {cx:.3} x {cy:.3}");

    let mut buckets: Vec<Vec<Displacement>> = vec![Vec::new(); quantizer.buckets()];
    for (x, y, _, angle) in shape.edge_pixels() {
        let rx = (cx - x as f64) as i32;
        let ry = (cy - y as f64) as i32;
        buckets[quantizer.bucket(angle)].push(Displacement::new(rx, ry));
    }

    let table = RTable::from_parts(quantizer, [cx as f32, cy as f32], buckets)?;
    debug!(
        "r-table: {} vectors in {} buckets (largest {})",
        table.len(),
        table.buckets().iter().filter(|b| !b.is_empty()).count(),
        table.max_bucket_len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn square_outline(size: usize, lo: usize, hi: usize) -> EdgeMap {
        EdgeMap::from_fn(size, size, |x, y| {
            let on_x = (x == lo || x == hi) && (lo..=hi).contains(&y);
            let on_y = (y == lo || y == hi) && (lo..=hi).contains(&x);
            if !(on_x || on_y) {
                return (0.0, 0.0);
            }
            let angle = if x == lo {
                PI
            } else if x == hi {
                0.0
            } else if y == lo {
                1.5 * PI
            } else {
                0.5 * PI
            };
            (2.0, angle)
        })
        .expect("edge map")
    }

    #[test]
    fn every_edge_pixel_contributes_once() {
        let shape = square_outline(16, 3, 12);
        let table = learn(&shape, DirectionQuantizer::default()).expect("learn");
        assert_eq!(table.len(), shape.edge_count());
        assert_eq!(table.bucket_count(), 64);
        let populated: Vec<usize> = (0..64).filter(|&b| !table.bucket(b).is_empty()).collect();
        assert_eq!(populated, vec![0, 16, 32, 48]);
    }

    #[test]
    fn centroid_is_magnitude_weighted() {
        let shape = EdgeMap::from_fn(4, 1, |x, _| match x {
            0 => (1.0, 0.0),
            3 => (3.0, 0.0),
            _ => (0.0, 0.0),
        })
        .expect("edge map");
        let [cx, cy] = shape_centroid(&shape).expect("centroid");
        assert!((cx - 2.25).abs() < 1e-9);
        assert_eq!(cy, 0.0);

        let table = learn(&shape, DirectionQuantizer::default()).expect("learn");
        // trunc(2.25 - 0) = 2, trunc(2.25 - 3) = 0
        assert_eq!(
            table.bucket(0),
            &[Displacement::new(2, 0), Displacement::new(0, 0)]
        );
        assert_eq!(table.centroid(), [2.25, 0.0]);
    }

    #[test]
    fn displacements_point_at_centroid() {
        let shape = square_outline(16, 3, 12);
        let table = learn(&shape, DirectionQuantizer::default()).expect("learn");
        // left side sits at x=3, centroid x=7.5 -> rx = trunc(4.5) = 4
        assert!(table.bucket(32).iter().all(|d| d.rx == 4));
        // right side sits at x=12 -> rx = trunc(-4.5) = -4
        assert!(table.bucket(0).iter().all(|d| d.rx == -4));
    }

    #[test]
    fn empty_shape_is_an_error() {
        let shape = EdgeMap::empty(8, 8);
        assert_eq!(
            learn(&shape, DirectionQuantizer::default()).unwrap_err(),
            GhtError::EmptyShape
        );
    }
}
