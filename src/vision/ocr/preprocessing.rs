// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for digit recognition
//!
//! Steps applied to every region:
//! 1. Crop the RGB raster to the region
//! 2. Convert to grayscale (BT.601 luma)
//! 3. Binarize with Otsu's level, inverted so ink becomes 255

use image::{imageops, GrayImage, Luma, RgbImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use tracing::debug;

use super::region::CropRect;

/// Foreground (estimated text) value after binarization
pub const FOREGROUND: u8 = 255;

/// Background value after binarization
pub const BACKGROUND: u8 = 0;

// BT.601 weights in 14-bit fixed point; they sum to 1 << 14.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Crop `image` to `rect`.
///
/// `crop_imm` takes (column, row) offsets, so this is the `[y1:y2, x1:x2]`
/// row-major slice of the raster.
pub fn crop_region(image: &RgbImage, rect: &CropRect) -> RgbImage {
    imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image()
}

/// Convert an RGB raster to single-channel grayscale using
/// `0.299 R + 0.587 G + 0.114 B`, rounded to nearest.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = (r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B
            + (1 << (LUMA_SHIFT - 1)))
            >> LUMA_SHIFT;
        gray.put_pixel(x, y, Luma([luma as u8]));
    }
    gray
}

/// Binarize with Otsu's global threshold and inverted binary output.
///
/// Pixels above the Otsu level become [`BACKGROUND`], all others become
/// [`FOREGROUND`]; dark ink on a light background ends up as the high value.
pub fn binarize_inverted_otsu(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    debug!(
        "Otsu level {} for {}x{} crop",
        level,
        gray.width(),
        gray.height()
    );
    threshold(gray, level, ThresholdType::BinaryInverted)
}

/// Full preprocessing chain for one region
pub fn preprocess_region(image: &RgbImage, rect: &CropRect) -> GrayImage {
    let cropped = crop_region(image, rect);
    let gray = to_grayscale(&cropped);
    binarize_inverted_otsu(&gray)
}

/// Whether a binarized crop holds any foreground pixel
pub fn has_foreground(binary: &GrayImage) -> bool {
    binary.pixels().any(|p| p.0[0] == FOREGROUND)
}
