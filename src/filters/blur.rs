//! Box blur for RGBA images.
//!
//! Every pixel, including the edges, is replaced by the average of its
//! in-bounds neighbours within a fixed radius. All four channels are averaged,
//! so alpha is blurred along with RGB.

use super::core::{map_windows, EdgePolicy};
use super::mask::RegionMask;
use crate::buffer::PixelBuffer;

/// Neighbourhood radius: the window spans `2 * BLUR_RADIUS + 1` pixels per axis.
pub const BLUR_RADIUS: isize = 2;

/// Apply a box blur.
///
/// Out-of-bounds neighbours are excluded and the divisor is the number of
/// samples actually gathered, so edge pixels average over a smaller window.
/// Sums are divided with integer truncation.
///
/// # Arguments
/// * `input` - RGBA image
/// * `mask` - Region mask
///
/// # Returns
/// Blurred image with same dimensions
pub fn box_blur(input: &PixelBuffer, mask: RegionMask) -> PixelBuffer {
    map_windows(input, mask, EdgePolicy::Clip, |src, x, y| {
        let (height, width, _) = src.dim();
        let mut totals = [0u32; 4];
        let mut count = 0u32;

        for dy in -BLUR_RADIUS..=BLUR_RADIUS {
            let sy = y as isize + dy;
            if sy < 0 || sy >= height as isize {
                continue;
            }
            for dx in -BLUR_RADIUS..=BLUR_RADIUS {
                let sx = x as isize + dx;
                if sx < 0 || sx >= width as isize {
                    continue;
                }
                let (sy, sx) = (sy as usize, sx as usize);
                for (c, total) in totals.iter_mut().enumerate() {
                    *total += src[[sy, sx, c]] as u32;
                }
                count += 1;
            }
        }

        // The centre pixel is always in bounds, so count >= 1.
        totals.map(|t| (t / count) as u8)
    })
}
