//! Sharpen filter (3x3 Laplacian kernel).
//!
//! The one-pixel border is copied from the input; alpha is preserved.

use super::core::{clamp_channel, map_windows, EdgePolicy};
use super::mask::RegionMask;
use crate::buffer::PixelBuffer;

const SHARPEN_KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

/// Sharpen with the kernel `[[0,-1,0],[-1,5,-1],[0,-1,0]]`.
///
/// # Arguments
/// * `input` - RGBA image
/// * `mask` - Region mask
///
/// # Returns
/// Sharpened image; R, G, B are the clamped weighted sums
pub fn sharpen(input: &PixelBuffer, mask: RegionMask) -> PixelBuffer {
    map_windows(input, mask, EdgePolicy::Keep, |src, x, y| {
        let mut sums = [0.0f32; 3];

        for ky in 0..3 {
            for kx in 0..3 {
                let weight = SHARPEN_KERNEL[ky][kx];
                if weight == 0.0 {
                    continue;
                }
                let (py, px) = (y + ky - 1, x + kx - 1);
                for (c, sum) in sums.iter_mut().enumerate() {
                    *sum += src[[py, px, c]] as f32 * weight;
                }
            }
        }

        [
            clamp_channel(sums[0]),
            clamp_channel(sums[1]),
            clamp_channel(sums[2]),
            src[[y, x, 3]],
        ]
    })
}
