use ght_detector::image::ImageU8;

/// Owned 8-bit test image.
pub struct TestImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl TestImage {
    pub fn view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

/// Renders a filled, axis-aligned "L": a vertical bar of `arm` x `thickness`
/// joined at its bottom to a horizontal bar, with the top-left corner at
/// `(x0, y0)`. The shape has no rotational symmetry.
#[allow(clippy::too_many_arguments)]
pub fn l_shape_u8(
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    vertical: usize,
    horizontal: usize,
    thickness: usize,
) -> TestImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(
        x0 + horizontal < width && y0 + vertical < height,
        "shape must fit inside the image"
    );

    let mut data = vec![32u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let in_vertical = (x0..x0 + thickness).contains(&x) && (y0..y0 + vertical).contains(&y);
            let in_horizontal = (x0..x0 + horizontal).contains(&x)
                && (y0 + vertical - thickness..y0 + vertical).contains(&y);
            if in_vertical || in_horizontal {
                data[y * width + x] = 220;
            }
        }
    }
    TestImage {
        width,
        height,
        data,
    }
}
