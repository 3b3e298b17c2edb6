//! Edge filters: Contour.
//!
//! Works on R, G, B independently with integer arithmetic. Alpha is preserved
//! and the one-pixel border is copied from the input.

use super::core::{clamp_channel_i32, map_windows, EdgePolicy};
use super::mask::RegionMask;
use crate::buffer::PixelBuffer;

/// Kernel scale: centre weight `8 * k`, neighbour weight `-k`.
pub const CONTOUR_COEFF: i32 = 3;

const CONTOUR_KERNEL: [[i32; 3]; 3] = [
    [-CONTOUR_COEFF, -CONTOUR_COEFF, -CONTOUR_COEFF],
    [-CONTOUR_COEFF, 8 * CONTOUR_COEFF, -CONTOUR_COEFF],
    [-CONTOUR_COEFF, -CONTOUR_COEFF, -CONTOUR_COEFF],
];

/// Apply the contour (outline) filter.
///
/// The weighted sum is divided by the sum of the kernel weights. For this
/// kernel that sum is zero, in which case the division is skipped and the raw
/// sum is clamped.
///
/// # Arguments
/// * `input` - RGBA image
/// * `mask` - Region mask
///
/// # Returns
/// Image where flat areas turn black and edges light up
pub fn contour(input: &PixelBuffer, mask: RegionMask) -> PixelBuffer {
    let weight_sum: i32 = CONTOUR_KERNEL.iter().flatten().sum();

    map_windows(input, mask, EdgePolicy::Keep, |src, x, y| {
        let mut sums = [0i32; 3];

        for ky in 0..3 {
            for kx in 0..3 {
                let weight = CONTOUR_KERNEL[ky][kx];
                let (py, px) = (y + ky - 1, x + kx - 1);
                for (c, sum) in sums.iter_mut().enumerate() {
                    *sum += src[[py, px, c]] as i32 * weight;
                }
            }
        }

        if weight_sum != 0 {
            for sum in sums.iter_mut() {
                *sum /= weight_sum;
            }
        }

        [
            clamp_channel_i32(sums[0]),
            clamp_channel_i32(sums[1]),
            clamp_channel_i32(sums[2]),
            src[[y, x, 3]],
        ]
    })
}
