//! RGBA8 raster buffer shared by every filter.
//!
//! Pixels are stored as an `(height, width, 4)` array in row-major order, the
//! same layout the filter modules index with `[[y, x, c]]`. Channel order is
//! R, G, B, A.

use ndarray::{Array3, ArrayView3};

use crate::error::{RetouchError, RetouchResult};

/// Number of channels per pixel.
pub const CHANNELS: usize = 4;

/// Immutable-by-convention RGBA8 raster.
///
/// Filters never mutate their input; they return a fresh buffer of the same
/// dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Create a buffer where every pixel has the given RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let shape = (height as usize, width as usize, CHANNELS);
        let data = Array3::from_shape_fn(shape, |(_, _, c)| rgba[c]);
        Self { data }
    }

    /// Wrap a flat RGBA byte vector (length = width * height * 4).
    ///
    /// A zero-sized image is treated as no image at all.
    pub fn from_raw(width: u32, height: u32, raw: Vec<u8>) -> RetouchResult<Self> {
        if width == 0 || height == 0 {
            return Err(RetouchError::MissingInput);
        }
        let shape = (height as usize, width as usize, CHANNELS);
        let len = raw.len();
        let data = Array3::from_shape_vec(shape, raw).map_err(|_| RetouchError::DimensionMismatch {
            expected: format!(
                "{} bytes for {}x{} RGBA",
                shape.0 * shape.1 * CHANNELS,
                width,
                height
            ),
            actual: format!("{len} bytes"),
        })?;
        Ok(Self { data })
    }

    /// Wrap an `(height, width, 4)` array.
    pub fn from_array(data: Array3<u8>) -> RetouchResult<Self> {
        let (height, width, channels) = data.dim();
        if height == 0 || width == 0 {
            return Err(RetouchError::MissingInput);
        }
        if channels != CHANNELS {
            return Err(RetouchError::shape_mismatch(
                (height, width, CHANNELS),
                (height, width, channels),
            ));
        }
        Ok(Self { data })
    }

    /// Wrap an array already known to have four channels.
    pub(crate) fn from_rgba_array(data: Array3<u8>) -> Self {
        debug_assert_eq!(data.dim().2, CHANNELS);
        Self { data }
    }

    pub fn width(&self) -> u32 {
        self.data.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.data.dim().0 as u32
    }

    pub fn pixel_count(&self) -> usize {
        let (height, width, _) = self.data.dim();
        height * width
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Read one pixel. Panics if `(x, y)` is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let (x, y) = (x as usize, y as usize);
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
            self.data[[y, x, 3]],
        ]
    }

    /// Overwrite one pixel. Panics if `(x, y)` is outside the buffer.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let (x, y) = (x as usize, y as usize);
        for c in 0..CHANNELS {
            self.data[[y, x, c]] = rgba[c];
        }
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Flatten to RGBA bytes in raster order.
    pub fn into_raw(self) -> Vec<u8> {
        if self.data.is_standard_layout() {
            self.data.into_raw_vec_and_offset().0
        } else {
            self.data.iter().copied().collect()
        }
    }

    /// Fail with `DimensionMismatch` unless `other` has the same shape.
    pub fn ensure_same_shape(&self, other: &PixelBuffer) -> RetouchResult<()> {
        if self.data.dim() != other.data.dim() {
            return Err(RetouchError::shape_mismatch(self.data.dim(), other.data.dim()));
        }
        Ok(())
    }

    /// Nearest-neighbour downscale by `scale` in (0, 1].
    ///
    /// Target size is `trunc(width * scale) x trunc(height * scale)`. Returns
    /// `None` when the scale is outside (0, 1] or a target dimension would be 0.
    pub fn downscale(&self, scale: f32) -> Option<PixelBuffer> {
        if !(scale > 0.0 && scale <= 1.0) {
            return None;
        }
        let (src_h, src_w, _) = self.data.dim();
        let dst_w = (src_w as f32 * scale) as usize;
        let dst_h = (src_h as f32 * scale) as usize;
        if dst_w == 0 || dst_h == 0 {
            return None;
        }
        if dst_w == src_w && dst_h == src_h {
            return Some(self.clone());
        }

        let mut data = Array3::<u8>::zeros((dst_h, dst_w, CHANNELS));
        for y in 0..dst_h {
            let src_y = y * src_h / dst_h;
            for x in 0..dst_w {
                let src_x = x * src_w / dst_w;
                for c in 0..CHANNELS {
                    data[[y, x, c]] = self.data[[src_y, src_x, c]];
                }
            }
        }
        Some(Self { data })
    }
}
