//! WebAssembly exports for the retouch filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen and work on
//! flat RGBA byte arrays (length = width * height * 4), the layout of
//! `ImageData.data`. Errors are thrown as JS strings.

use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::error::RetouchError;
use crate::filters::{self, blur, color_adjust, edge, levels, sharpen, stylize, RegionMask};
use crate::params::{FilterParams, ParamField};

fn to_js(err: RetouchError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn run<F>(
    data: &[u8],
    width: u32,
    height: u32,
    edit_half: bool,
    filter: F,
) -> Result<Vec<u8>, JsValue>
where
    F: FnOnce(&PixelBuffer, RegionMask) -> PixelBuffer,
{
    let input = PixelBuffer::from_raw(width, height, data.to_vec()).map_err(to_js)?;
    Ok(filter(&input, RegionMask::new(edit_half)).into_raw())
}

// ============================================================================
// Color Adjustment Filters
// ============================================================================

#[wasm_bindgen]
pub fn invert_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, edit_half, color_adjust::invert)
}

#[wasm_bindgen]
pub fn brightness_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    amount: f32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    let amount = ParamField::Brightness.validate(amount).map_err(to_js)?;
    run(data, width, height, edit_half, |b, m| color_adjust::brightness(b, m, amount))
}

#[wasm_bindgen]
pub fn contrast_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    contrast: f32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    let contrast = ParamField::Contrast.validate(contrast).map_err(to_js)?;
    run(data, width, height, edit_half, |b, m| color_adjust::contrast(b, m, contrast))
}

// ============================================================================
// Levels
// ============================================================================

#[wasm_bindgen]
pub fn histogram_correction_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    offset_bottom: u32,
    offset_top: u32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    ParamField::HistogramOffsetBottom
        .validate(offset_bottom as f32)
        .map_err(to_js)?;
    ParamField::HistogramOffsetTop
        .validate(offset_top as f32)
        .map_err(to_js)?;
    run(data, width, height, edit_half, |b, m| {
        levels::histogram_correction(b, m, offset_bottom, offset_top)
    })
}

/// Luminance histogram, 256 counts.
#[wasm_bindgen]
pub fn histogram_wasm(data: &[u8], width: u32, height: u32) -> Result<Vec<u32>, JsValue> {
    let input = PixelBuffer::from_raw(width, height, data.to_vec()).map_err(to_js)?;
    Ok(filters::compute_histogram(&input).to_vec())
}

// ============================================================================
// One-shot Filters
// ============================================================================

#[wasm_bindgen]
pub fn box_blur_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, edit_half, blur::box_blur)
}

#[wasm_bindgen]
pub fn sharpen_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, edit_half, sharpen::sharpen)
}

#[wasm_bindgen]
pub fn emboss_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, edit_half, stylize::emboss)
}

#[wasm_bindgen]
pub fn contour_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, edit_half, edge::contour)
}

// ============================================================================
// Live Pipeline
// ============================================================================

/// Histogram stretch, brightness and contrast in pipeline order.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn apply_all_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    brightness: f32,
    contrast: f32,
    histogram_offset_bottom: f32,
    histogram_offset_top: f32,
    edit_half: bool,
) -> Result<Vec<u8>, JsValue> {
    let params = FilterParams::default()
        .with(ParamField::Brightness, brightness)
        .and_then(|p| p.with(ParamField::Contrast, contrast))
        .and_then(|p| p.with(ParamField::HistogramOffsetBottom, histogram_offset_bottom))
        .and_then(|p| p.with(ParamField::HistogramOffsetTop, histogram_offset_top))
        .map_err(to_js)?;
    run(data, width, height, edit_half, |b, m| filters::apply_all(&params, b, m))
}
