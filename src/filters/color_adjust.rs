//! Color adjustment filters: Invert, Brightness, Contrast.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Alpha is always preserved unchanged; R, G and B are processed
//! independently and clamped to 0-255.

use super::core::{clamp_channel_i32, map_pixels};
use super::mask::RegionMask;
use crate::buffer::PixelBuffer;

// ============================================================================
// Invert
// ============================================================================

/// Invert colors: `255 - v` for R, G, B.
///
/// Applying it twice returns the original buffer.
pub fn invert(input: &PixelBuffer, mask: RegionMask) -> PixelBuffer {
    map_pixels(input, mask, |[r, g, b, a]| [255 - r, 255 - g, 255 - b, a])
}

// ============================================================================
// Brightness
// ============================================================================

/// Scale brightness multiplicatively.
///
/// # Arguments
/// * `input` - RGBA image
/// * `mask` - Region mask
/// * `amount` - -1.0 (black) to 1.0 (double), 0.0 = no change
///
/// # Returns
/// Buffer where each color channel is `trunc(v * (1 + amount))`, clamped
pub fn brightness(input: &PixelBuffer, mask: RegionMask, amount: f32) -> PixelBuffer {
    let factor = 1.0 + amount;
    let scale = |v: u8| clamp_channel_i32((v as f32 * factor) as i32);

    map_pixels(input, mask, |[r, g, b, a]| [scale(r), scale(g), scale(b), a])
}

// ============================================================================
// Contrast
// ============================================================================

/// Adjust contrast around mid-gray.
///
/// # Arguments
/// * `input` - RGBA image
/// * `mask` - Region mask
/// * `contrast` - 0.5 to 2.0; the applied factor is `contrast²`, 1.0 = no change
///
/// # Returns
/// Buffer where each color channel is `((v/255 - 0.5) * factor + 0.5) * 255`,
/// truncated and clamped
pub fn contrast(input: &PixelBuffer, mask: RegionMask, contrast: f32) -> PixelBuffer {
    let factor = (contrast * contrast) as f64;
    let stretch = |v: u8| {
        let adjusted = ((v as f64 / 255.0 - 0.5) * factor + 0.5) * 255.0;
        clamp_channel_i32(adjusted as i32)
    };

    map_pixels(input, mask, |[r, g, b, a]| [stretch(r), stretch(g), stretch(b), a])
}
