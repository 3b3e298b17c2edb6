//! Filter composition: the live-parameter pipeline and one-shot filters.

use std::fmt;

use super::mask::RegionMask;
use super::{blur, color_adjust, edge, levels, sharpen, stylize};
use crate::buffer::PixelBuffer;
use crate::params::FilterParams;

/// Contrast value whose factor (`c²`) is 1.
const NEUTRAL_CONTRAST: f32 = 1.0;

/// Apply every live parameter to `original`.
///
/// Order: histogram stretch (only if an offset is non-zero), brightness (only
/// if non-zero), contrast (only if the factor differs from 1). The default
/// snapshot therefore runs the contrast branch alone.
///
/// `histogram_offset_bottom` clips the dark end and `histogram_offset_top`
/// the bright end. Float offsets are truncated to whole levels.
pub fn apply_all(params: &FilterParams, original: &PixelBuffer, mask: RegionMask) -> PixelBuffer {
    let mut result: Option<PixelBuffer> = None;

    if params.has_histogram_offsets() {
        let bottom = params.histogram_offset_bottom as u32;
        let top = params.histogram_offset_top as u32;
        tracing::trace!(bottom, top, "histogram stretch");
        result = Some(levels::histogram_correction(original, mask, bottom, top));
    }

    if params.brightness != 0.0 {
        tracing::trace!(brightness = params.brightness, "brightness");
        let src = result.as_ref().unwrap_or(original);
        result = Some(color_adjust::brightness(src, mask, params.brightness));
    }

    if params.contrast != NEUTRAL_CONTRAST {
        tracing::trace!(contrast = params.contrast, "contrast");
        let src = result.as_ref().unwrap_or(original);
        result = Some(color_adjust::contrast(src, mask, params.contrast));
    }

    result.unwrap_or_else(|| original.clone())
}

/// Destructive filters applied once and folded into the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneShotFilter {
    Invert,
    Blur,
    Sharpen,
    Emboss,
    Contour,
}

impl OneShotFilter {
    pub const ALL: [OneShotFilter; 5] = [
        OneShotFilter::Invert,
        OneShotFilter::Blur,
        OneShotFilter::Sharpen,
        OneShotFilter::Emboss,
        OneShotFilter::Contour,
    ];

    pub fn apply(self, input: &PixelBuffer, mask: RegionMask) -> PixelBuffer {
        match self {
            OneShotFilter::Invert => color_adjust::invert(input, mask),
            OneShotFilter::Blur => blur::box_blur(input, mask),
            OneShotFilter::Sharpen => sharpen::sharpen(input, mask),
            OneShotFilter::Emboss => stylize::emboss(input, mask),
            OneShotFilter::Contour => edge::contour(input, mask),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OneShotFilter::Invert => "invert",
            OneShotFilter::Blur => "blur",
            OneShotFilter::Sharpen => "sharpen",
            OneShotFilter::Emboss => "emboss",
            OneShotFilter::Contour => "contour",
        }
    }
}

impl fmt::Display for OneShotFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamField;

    fn textured(width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(
                    x,
                    y,
                    [(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11) as u8, 255],
                );
            }
        }
        img
    }

    #[test]
    fn test_default_params_only_apply_contrast() {
        let img = PixelBuffer::filled(4, 4, [128, 128, 128, 255]);

        let result = apply_all(&FilterParams::default(), &img, RegionMask::FULL);

        let expected = (((128.0f64 / 255.0 - 0.5) * 1.5625 + 0.5) * 255.0) as u8;
        assert_eq!(expected, 128);
        assert_eq!(result, PixelBuffer::filled(4, 4, [expected, expected, expected, 255]));
        assert_eq!(result, color_adjust::contrast(&img, RegionMask::FULL, 1.25));
    }

    #[test]
    fn test_neutral_params_are_identity() {
        let img = textured(6, 5);
        let params = FilterParams::default().with(ParamField::Contrast, 1.0).unwrap();

        assert_eq!(apply_all(&params, &img, RegionMask::FULL), img);
    }

    #[test]
    fn test_pipeline_order() {
        let img = textured(6, 5);
        let params = FilterParams {
            brightness: 0.3,
            contrast: 1.5,
            histogram_offset_bottom: 20.0,
            histogram_offset_top: 5.0,
        };

        let stretched = levels::histogram_correction(&img, RegionMask::FULL, 20, 5);
        let brightened = color_adjust::brightness(&stretched, RegionMask::FULL, 0.3);
        let expected = color_adjust::contrast(&brightened, RegionMask::FULL, 1.5);

        assert_eq!(apply_all(&params, &img, RegionMask::FULL), expected);
    }

    #[test]
    fn test_offsets_keep_their_ends() {
        let mut img = PixelBuffer::filled(2, 1, [0, 0, 0, 255]);
        img.set_pixel(0, 0, [30, 30, 30, 255]);
        img.set_pixel(1, 0, [240, 240, 240, 255]);
        let params = FilterParams {
            contrast: 1.0,
            histogram_offset_bottom: 50.0,
            ..FilterParams::default()
        };

        let result = apply_all(&params, &img, RegionMask::FULL);

        // Bottom offset blackens the dark pixel but leaves the bright one below 255
        assert_eq!(result.pixel(0, 0), [0, 0, 0, 255]);
        assert!(result.pixel(1, 0)[0] < 255);

        let params = FilterParams {
            contrast: 1.0,
            histogram_offset_top: 50.0,
            ..FilterParams::default()
        };
        let result = apply_all(&params, &img, RegionMask::FULL);
        assert_eq!(result.pixel(1, 0), [255, 255, 255, 255]);
        assert!(result.pixel(0, 0)[0] > 0);
    }

    #[test]
    fn test_fractional_offsets_truncate() {
        let img = textured(6, 5);
        let params = FilterParams {
            contrast: 1.0,
            histogram_offset_bottom: 12.9,
            ..FilterParams::default()
        };

        let expected = levels::histogram_correction(&img, RegionMask::FULL, 12, 0);

        assert_eq!(apply_all(&params, &img, RegionMask::FULL), expected);
    }

    #[test]
    fn test_pipeline_honors_mask() {
        let img = textured(8, 4);
        let params = FilterParams {
            brightness: 0.5,
            contrast: 2.0,
            histogram_offset_bottom: 30.0,
            histogram_offset_top: 30.0,
        };

        let result = apply_all(&params, &img, RegionMask::RIGHT_HALF);

        for y in 0..4 {
            for x in 0..=4 {
                assert_eq!(result.pixel(x, y), img.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_one_shot_filters_keep_dimensions_and_left_half() {
        let img = textured(9, 7);

        for filter in OneShotFilter::ALL {
            let result = filter.apply(&img, RegionMask::RIGHT_HALF);
            assert_eq!((result.width(), result.height()), (9, 7), "{filter}");
            for y in 0..7 {
                for x in 0..=4 {
                    assert_eq!(result.pixel(x, y), img.pixel(x, y), "{filter} at {x},{y}");
                }
            }
        }
    }

    #[test]
    fn test_one_shot_matches_direct_call() {
        let img = textured(5, 5);

        assert_eq!(
            OneShotFilter::Invert.apply(&img, RegionMask::FULL),
            color_adjust::invert(&img, RegionMask::FULL)
        );
        assert_eq!(
            OneShotFilter::Contour.apply(&img, RegionMask::FULL),
            edge::contour(&img, RegionMask::FULL)
        );
    }
}
