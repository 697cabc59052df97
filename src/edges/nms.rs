//! Non-maximum suppression on gradient magnitude with direction alignment.
//!
//! Canny-style thinning: each pixel is compared against its two neighbours
//! along the gradient direction quantized to 0°, 45°, 90° or 135°, and kept
//! only when strictly greater than both. Suppressed pixels get magnitude 0 in
//! the returned `EdgeMap`; angles are kept for every pixel.
use super::grad::Grad;
use super::map::EdgeMap;
use crate::image::{ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.41421356237;

/// Thin gradient ridges to one pixel and drop magnitudes below `mag_thresh`.
pub fn suppress_non_maxima(grad: &Grad, mag_thresh: f32) -> EdgeMap {
    let w = grad.gx.w;
    let h = grad.gx.h;
    let mut magnitude = ImageF32::new(w, h);
    let mut angle = ImageF32::new(w, h);

    for y in 0..h {
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let out = angle.row_mut(y);
        for x in 0..w {
            out[x] = gy_row[x].atan2(gx_row[x]);
        }
    }

    if w >= 3 && h >= 3 {
        for y in 1..h - 1 {
            let mag_prev = grad.mag.row(y - 1);
            let mag_row = grad.mag.row(y);
            let mag_next = grad.mag.row(y + 1);
            let gx_row = grad.gx.row(y);
            let gy_row = grad.gy.row(y);
            let out = magnitude.row_mut(y);

            for x in 1..w - 1 {
                let mag = mag_row[x];
                if mag < mag_thresh || mag <= 0.0 {
                    continue;
                }

                let gx = gx_row[x];
                let gy = gy_row[x];
                let abs_gx = gx.abs();
                let abs_gy = gy.abs();
                let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

                let (neighbor1, neighbor2) = if abs_gx >= abs_gy {
                    if abs_gy <= abs_gx * TAN_22_5_DEG {
                        (mag_row[x - 1], mag_row[x + 1])
                    } else if same_sign {
                        (mag_prev[x - 1], mag_next[x + 1])
                    } else {
                        (mag_prev[x + 1], mag_next[x - 1])
                    }
                } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                    (mag_prev[x], mag_next[x])
                } else if same_sign {
                    (mag_prev[x - 1], mag_next[x + 1])
                } else {
                    (mag_prev[x + 1], mag_next[x - 1])
                };

                // a two-pixel plateau keeps only its second pixel
                if mag < neighbor1 || mag <= neighbor2 {
                    continue;
                }
                out[x] = mag;
            }
        }
    }

    // angles come from atan2, magnitudes are non-negative: construction cannot fail
    EdgeMap::new(magnitude, angle).unwrap_or_else(|_| EdgeMap::empty(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::grad::{image_gradients, GradientKernel};

    fn disc(w: usize, h: usize, cx: f32, cy: f32, r: f32) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r * r {
                    img.set(x, y, 200.0);
                }
            }
        }
        img
    }

    #[test]
    fn step_edge_thins_to_single_column() {
        let mut img = ImageF32::new(12, 8);
        for y in 0..8 {
            for x in 6..12 {
                img.set(x, y, 100.0);
            }
        }
        let grad = image_gradients(&img, GradientKernel::Sobel);
        let edges = suppress_non_maxima(&grad, 1.0);
        for y in 1..7 {
            let row: Vec<usize> = (0..12).filter(|&x| edges.magnitude(x, y) > 0.0).collect();
            assert_eq!(row.len(), 1, "row {y}: {row:?}");
        }
        assert!(edges.angle(5, 3).abs() < 1e-5);
    }

    #[test]
    fn frame_is_always_suppressed() {
        let grad = image_gradients(&disc(20, 20, 10.0, 10.0, 6.0), GradientKernel::Sobel);
        let edges = suppress_non_maxima(&grad, 1.0);
        for i in 0..20 {
            assert_eq!(edges.magnitude(i, 0), 0.0);
            assert_eq!(edges.magnitude(i, 19), 0.0);
            assert_eq!(edges.magnitude(0, i), 0.0);
            assert_eq!(edges.magnitude(19, i), 0.0);
        }
        assert!(edges.edge_count() > 0);
    }

    #[test]
    fn disc_gradients_point_inwards() {
        let grad = image_gradients(&disc(32, 32, 16.0, 16.0, 8.0), GradientKernel::Sobel);
        let edges = suppress_non_maxima(&grad, 1.0);
        // bright disc on dark background: gradient on the left rim points +x
        let (x, _, _, a) = edges
            .pixels_at_least(1.0)
            .filter(|&(_, y, _, _)| y == 16)
            .min_by_key(|&(x, _, _, _)| x)
            .expect("left rim pixel");
        assert!(x < 16);
        assert!(a < 0.3 || a > std::f32::consts::TAU - 0.3, "angle {a}");
    }

    #[test]
    fn threshold_drops_weak_edges() {
        let grad = image_gradients(&disc(20, 20, 10.0, 10.0, 6.0), GradientKernel::Sobel);
        let edges = suppress_non_maxima(&grad, 1e9);
        assert_eq!(edges.edge_count(), 0);
    }
}
