//! Grayscale conversion and binary thresholding
//!
//! Luminance is the standard ITU-R BT.601 weighting
//! `Y = 0.299*R + 0.587*G + 0.114*B`, computed with exact integer rounding so
//! results are identical across platforms. Large pages convert rows in
//! parallel with rayon.

use rayon::prelude::*;

use crate::error::DetectionError;
use crate::models::{BinaryMask, PixelFormat, RasterImage};

/// Pixel count above which grayscale conversion goes row-parallel
const PARALLEL_PIXEL_THRESHOLD: usize = 512 * 512;

/// Luminance of an RGB triple with exact round-half-up, in [0, 255]
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    // round(0.299R + 0.587G + 0.114B) in integer arithmetic
    let y = (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000;
    y.min(255) as u8
}

/// Convert an RGB buffer to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];

    if pixel_count >= PARALLEL_PIXEL_THRESHOLD && width > 0 {
        gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            let row_start = y * width * 3;
            for (x, out) in row.iter_mut().enumerate() {
                let idx = row_start + x * 3;
                *out = luminance(rgb[idx], rgb[idx + 1], rgb[idx + 2]);
            }
        });
    } else {
        for (i, out) in gray.iter_mut().enumerate() {
            let idx = i * 3;
            *out = luminance(rgb[idx], rgb[idx + 1], rgb[idx + 2]);
        }
    }

    gray
}

/// Convert an RGBA buffer to grayscale, ignoring alpha
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];

    if pixel_count >= PARALLEL_PIXEL_THRESHOLD && width > 0 {
        gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            let row_start = y * width * 4;
            for (x, out) in row.iter_mut().enumerate() {
                let idx = row_start + x * 4;
                *out = luminance(rgba[idx], rgba[idx + 1], rgba[idx + 2]);
            }
        });
    } else {
        for (i, out) in gray.iter_mut().enumerate() {
            let idx = i * 4;
            *out = luminance(rgba[idx], rgba[idx + 1], rgba[idx + 2]);
        }
    }

    gray
}

/// Convert a raster image to a grayscale buffer, validating its length
pub fn to_grayscale(image: &RasterImage) -> Result<Vec<u8>, DetectionError> {
    let expected = image.expected_len();
    if image.data.len() != expected {
        return Err(DetectionError::BufferSize {
            width: image.width,
            height: image.height,
            format: image.format,
            expected,
            got: image.data.len(),
        });
    }

    Ok(match image.format {
        PixelFormat::Rgba8 => rgba_to_grayscale(&image.data, image.width, image.height),
        PixelFormat::Rgb8 => rgb_to_grayscale(&image.data, image.width, image.height),
        PixelFormat::Gray8 => image.data.clone(),
    })
}

/// Threshold a grayscale buffer into an ink/background mask
///
/// A pixel is ink when its luminance is strictly below `threshold`, so
/// raising the threshold never declassifies an ink pixel.
pub fn classify(gray: &[u8], width: usize, height: usize, threshold: u8) -> BinaryMask {
    let mut mask = BinaryMask::new(width, height);
    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            if gray[row + x] < threshold {
                mask.set_ink(x, y, true);
            }
        }
    }
    mask
}
