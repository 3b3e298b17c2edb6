//! Filter modules for image processing effects.
//!
//! ## Format
//!
//! Every filter takes a [`PixelBuffer`](crate::buffer::PixelBuffer) holding
//! RGBA8 pixels in an `(height, width, 4)` array and returns a new buffer of
//! the same dimensions. Inputs are never modified.
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Masked** - a [`RegionMask`] decides which columns are written; the rest
//!   is copied through bit-for-bit
//! - **Clamped** - channel arithmetic saturates to 0-255
//! - **Shared mapping** - per-pixel and per-window helpers in [`core`] do the
//!   iteration and masking for every filter
//! - **Thread-safe** - rows are processed in parallel with rayon
//!
//! ## Filter Categories
//!
//! | Filter | Module | Kind | Border |
//! |--------|--------|------|--------|
//! | invert, brightness, contrast | `color_adjust` | pixel-wise | n/a |
//! | histogram stretch, histogram | `levels` | lookup table / read-only | n/a |
//! | box blur | `blur` | 5x5 window | processed, shrinking divisor |
//! | sharpen | `sharpen` | 3x3 kernel | kept |
//! | emboss | `stylize` | 3x3 kernel on luminance | kept |
//! | contour | `edge` | 3x3 kernel | kept |

pub mod core;
pub mod mask;

pub mod blur;
pub mod color_adjust;
pub mod edge;
pub mod levels;
pub mod pipeline;
pub mod sharpen;
pub mod stylize;

pub use self::levels::{compute_histogram, Histogram};
pub use self::mask::RegionMask;
pub use self::pipeline::{apply_all, OneShotFilter};
