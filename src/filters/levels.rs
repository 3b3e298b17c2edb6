//! Tonal filters: Histogram stretch and histogram computation.
//!
//! The stretch clips the darkest and brightest input levels and spreads the
//! remaining range over 0-255 using one lookup table shared by R, G and B.

use ndarray::Axis;
use rayon::prelude::*;

use super::core::{luminance, map_pixels};
use super::mask::RegionMask;
use crate::buffer::PixelBuffer;

/// Largest accepted offset per end; keeps the stretched range non-empty.
pub const MAX_HISTOGRAM_OFFSET: u32 = 100;

// ============================================================================
// Histogram
// ============================================================================

/// Luminance histogram with 256 buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u32; 256],
}

impl Histogram {
    pub fn counts(&self) -> &[u32; 256] {
        &self.counts
    }

    /// Sum of all buckets (the pixel count of the source buffer).
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Highest bucket count, useful for normalising a plot.
    pub fn peak(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.counts.to_vec()
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self { counts: [0; 256] }
    }
}

/// Count pixels per luminance bucket.
///
/// Bucket = `round(0.299R + 0.587G + 0.114B)`, clamped to 0-255. Always reads
/// the whole buffer; region masks do not apply.
pub fn compute_histogram(input: &PixelBuffer) -> Histogram {
    let counts = input
        .view()
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| {
            let mut counts = [0u32; 256];
            for px in row.outer_iter() {
                let lum = luminance(px[0], px[1], px[2]).round().clamp(0.0, 255.0) as usize;
                counts[lum] += 1;
            }
            counts
        })
        .reduce(
            || [0u32; 256],
            |mut acc, part| {
                for (a, p) in acc.iter_mut().zip(part.iter()) {
                    *a += p;
                }
                acc
            },
        );

    Histogram { counts }
}

// ============================================================================
// Histogram stretch
// ============================================================================

/// Build the stretch lookup table.
///
/// Levels below `offset_bottom` map to 0, the top `offset_top` levels map to
/// 255, and the levels in between start at 0 and advance by
/// `256 / (256 - offset_bottom - offset_top)`, rounded half up. Both offsets
/// are clamped to [`MAX_HISTOGRAM_OFFSET`].
pub fn build_stretch_lut(offset_bottom: u32, offset_top: u32) -> [u8; 256] {
    let bottom = offset_bottom.min(MAX_HISTOGRAM_OFFSET) as usize;
    let top = offset_top.min(MAX_HISTOGRAM_OFFSET) as usize;
    let mut lut = [0u8; 256];

    for entry in lut.iter_mut().skip(256 - top) {
        *entry = 255;
    }

    let step = 256.0 / (256 - bottom - top) as f64;
    let mut value = 0.0f64;
    for entry in lut.iter_mut().take(256 - top).skip(bottom) {
        *entry = (value + 0.5).min(255.0) as u8;
        value += step;
    }

    lut
}

/// Stretch the histogram by clipping both ends.
///
/// # Arguments
/// * `input` - RGBA image
/// * `mask` - Region mask
/// * `offset_bottom` - Dark levels forced to black (0-100)
/// * `offset_top` - Bright levels forced to white (0-100)
///
/// # Returns
/// Image with R, G, B remapped through one shared table; alpha unchanged
pub fn histogram_correction(
    input: &PixelBuffer,
    mask: RegionMask,
    offset_bottom: u32,
    offset_top: u32,
) -> PixelBuffer {
    let lut = build_stretch_lut(offset_bottom, offset_top);

    map_pixels(input, mask, |[r, g, b, a]| {
        [lut[r as usize], lut[g as usize], lut[b as usize], a]
    })
}
