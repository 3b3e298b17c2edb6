//! Core utilities for image processing filters.
//!
//! This module provides shared functionality used by every filter:
//! - Masked per-pixel mapping
//! - Masked per-window (convolution) mapping with an edge policy
//! - Luminance and channel clamping helpers
//!
//! Both mappers start from a copy of the input and only overwrite pixels the
//! [`RegionMask`] lets through, so skipped pixels are bit-identical to the
//! input. Rows are processed in parallel.

use ndarray::{ArrayView3, Axis};
use rayon::prelude::*;

use super::mask::RegionMask;
use crate::buffer::PixelBuffer;

// BT.601 luma coefficients
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Luminance of an RGB triple (0.0-255.0).
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    r as f32 * LUMA_R + g as f32 * LUMA_G + b as f32 * LUMA_B
}

/// Clamp to 0-255, truncating any fraction.
#[inline]
pub fn clamp_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Clamp an integer accumulator to 0-255.
#[inline]
pub fn clamp_channel_i32(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// How a window transform treats the outermost pixel ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Leave row 0, the last row, column 0 and the last column untouched.
    /// The window function may then index `x ± 1`, `y ± 1` freely.
    Keep,
    /// Process every pixel; the window function must bounds-check neighbours.
    Clip,
}

/// Apply a per-pixel transform to every pixel the mask lets through.
///
/// # Arguments
/// * `input` - Source buffer (never modified)
/// * `mask` - Region mask deciding which columns participate
/// * `transform` - Maps an RGBA pixel to its new value
///
/// # Returns
/// New buffer with the same dimensions
pub fn map_pixels<F>(input: &PixelBuffer, mask: RegionMask, transform: F) -> PixelBuffer
where
    F: Fn([u8; 4]) -> [u8; 4] + Sync,
{
    let width = input.width() as usize;
    let mut output = input.as_array().clone();

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|mut row| {
            for x in 0..width {
                if !mask.participates(x, width) {
                    continue;
                }
                let px = [row[[x, 0]], row[[x, 1]], row[[x, 2]], row[[x, 3]]];
                let out = transform(px);
                for c in 0..4 {
                    row[[x, c]] = out[c];
                }
            }
        });

    PixelBuffer::from_rgba_array(output)
}

/// Apply a neighbourhood transform to every pixel the mask lets through.
///
/// Neighbours are always read from the untouched input, never from pixels
/// already written in this pass.
///
/// # Arguments
/// * `input` - Source buffer (never modified)
/// * `mask` - Region mask deciding which columns participate
/// * `edges` - Whether the one-pixel border is skipped
/// * `transform` - Receives the full input view and the `(x, y)` being computed
///
/// # Returns
/// New buffer with the same dimensions
pub fn map_windows<F>(
    input: &PixelBuffer,
    mask: RegionMask,
    edges: EdgePolicy,
    transform: F,
) -> PixelBuffer
where
    F: Fn(ArrayView3<u8>, usize, usize) -> [u8; 4] + Sync,
{
    let src = input.view();
    let (height, width, _) = src.dim();
    let mut output = input.as_array().clone();

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            if edges == EdgePolicy::Keep && (y == 0 || y + 1 >= height) {
                return;
            }
            for x in 0..width {
                if edges == EdgePolicy::Keep && (x == 0 || x + 1 >= width) {
                    continue;
                }
                if !mask.participates(x, width) {
                    continue;
                }
                let out = transform(src, x, y);
                for c in 0..4 {
                    row[[x, c]] = out[c];
                }
            }
        });

    PixelBuffer::from_rgba_array(output)
}
