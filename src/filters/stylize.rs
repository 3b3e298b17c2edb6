//! Stylize filters: Emboss.
//!
//! Output is grayscale (same value for R, G and B); alpha is preserved and the
//! one-pixel border is copied from the input.

use super::core::{clamp_channel, luminance, map_windows, EdgePolicy};
use super::mask::RegionMask;
use crate::buffer::PixelBuffer;

const EMBOSS_KERNEL: [[f32; 3]; 3] = [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];

// Shifts the signed response into the middle of the gray range
const EMBOSS_OFFSET: f32 = 128.0;

/// Apply emboss effect.
///
/// Convolves the luminance of each neighbour with
/// `[[-1,0,0],[0,1,0],[0,0,0]]`, adds 128 and writes the clamped result as
/// gray.
///
/// # Arguments
/// * `input` - RGBA image
/// * `mask` - Region mask
///
/// # Returns
/// Embossed image with same dimensions
pub fn emboss(input: &PixelBuffer, mask: RegionMask) -> PixelBuffer {
    map_windows(input, mask, EdgePolicy::Keep, |src, x, y| {
        let mut intensity = 0.0f32;

        for ky in 0..3 {
            for kx in 0..3 {
                let weight = EMBOSS_KERNEL[ky][kx];
                if weight == 0.0 {
                    continue;
                }
                let (py, px) = (y + ky - 1, x + kx - 1);
                let lum = luminance(src[[py, px, 0]], src[[py, px, 1]], src[[py, px, 2]]);
                intensity += lum * weight;
            }
        }

        let gray = clamp_channel(intensity + EMBOSS_OFFSET);
        [gray, gray, gray, src[[y, x, 3]]]
    })
}
