//! Pixel arithmetic on RGB rasters
//!
//! These mirror the usual image "channel operations": every channel of every
//! pixel is treated as an independent 0-255 intensity.

use image::{Rgb, RgbImage};

/// Tight bounding box of non-zero pixels, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// `minuend - subtrahend` per channel, floored at zero
///
/// Only channels that got brighter in `minuend` survive. Both images must
/// have the same dimensions.
pub fn subtract(minuend: &RgbImage, subtrahend: &RgbImage) -> RgbImage {
    debug_assert_eq!(minuend.dimensions(), subtrahend.dimensions());

    let (width, height) = minuend.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let a = minuend.get_pixel(x, y);
        let b = subtrahend.get_pixel(x, y);
        Rgb([
            a[0].saturating_sub(b[0]),
            a[1].saturating_sub(b[1]),
            a[2].saturating_sub(b[2]),
        ])
    })
}

/// `a * b / 255` per channel, truncated
pub fn multiply(a: &RgbImage, b: &RgbImage) -> RgbImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());

    let (width, height) = a.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let pa = a.get_pixel(x, y);
        let pb = b.get_pixel(x, y);
        Rgb([
            mul_div_255(pa[0], pb[0]),
            mul_div_255(pa[1], pb[1]),
            mul_div_255(pa[2], pb[2]),
        ])
    })
}

fn mul_div_255(a: u8, b: u8) -> u8 {
    (u32::from(a) * u32::from(b) / 255) as u8
}

/// Shift an image by `(dx, dy)` pixels; uncovered pixels are zero
///
/// Output pixel `(x, y)` takes the value of input pixel `(x - dx, y - dy)`.
pub fn offset(image: &RgbImage, dx: i64, dy: i64) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let sx = i64::from(x) - dx;
        let sy = i64::from(y) - dy;
        if sx < 0 || sy < 0 || sx >= i64::from(width) || sy >= i64::from(height) {
            Rgb([0, 0, 0])
        } else {
            *image.get_pixel(sx as u32, sy as u32)
        }
    })
}

/// Multiply a diff with itself shifted one pixel right and one pixel down
///
/// A hairline only has extent along one axis, so the two shifted copies never
/// overlap and the product vanishes. Areas that differ survive.
pub fn shake_map(diff: &RgbImage) -> RgbImage {
    multiply(&offset(diff, 1, 0), &offset(diff, 0, 1))
}

/// Bounding box of all pixels with any non-zero channel, `None` if there are none
pub fn bounding_box(image: &RgbImage) -> Option<BoundingBox> {
    let mut bbox: Option<BoundingBox> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 == [0, 0, 0] {
            continue;
        }
        let b = bbox.get_or_insert(BoundingBox {
            left: x,
            top: y,
            right: x + 1,
            bottom: y + 1,
        });
        b.left = b.left.min(x);
        b.top = b.top.min(y);
        b.right = b.right.max(x + 1);
        b.bottom = b.bottom.max(y + 1);
    }

    bbox
}

/// Mean channel intensity as a ratio in `0.0..=1.0`
pub fn average_intensity(image: &RgbImage) -> f64 {
    let samples = image.as_raw();
    if samples.is_empty() {
        return 0.0;
    }

    let sum: u64 = samples.iter().map(|&v| u64::from(v)).sum();
    sum as f64 / samples.len() as f64 / 255.0
}
