//! Retouch
//!
//! Photo retouching core: pixel filters over RGBA8 buffers and a preview
//! scheduler that keeps slider edits responsive by rendering on a downsampled
//! copy first and recomputing at full resolution once the user pauses.
//!
//! ## Image Format
//! [`PixelBuffer`] wraps an ndarray of shape `(height, width, 4)`, one `u8`
//! per channel in R, G, B, A order. Filters never mutate their input.
//!
//! ## Layout
//! - [`filters`] - pure filter functions, histogram and the live pipeline
//! - [`params`] - validated live parameters (brightness, contrast, offsets)
//! - [`preview`] - debounced fast/full preview scheduling on tokio
//! - [`logging`] - optional `tracing` subscriber setup
//!
//! Python bindings (feature `python`) and WASM bindings (feature `wasm`) wrap
//! the filter functions for numpy arrays and flat byte slices respectively.

pub mod buffer;
pub mod error;
pub mod filters;
pub mod logging;
pub mod params;
pub mod preview;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::PixelBuffer;
pub use error::{RetouchError, RetouchResult};
pub use filters::{apply_all, compute_histogram, Histogram, OneShotFilter, RegionMask};
pub use params::{FilterParameterStore, FilterParams, ParamField};
pub use preview::{PreviewConfig, PreviewHandle, PreviewScheduler, PreviewSnapshot};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::PixelBuffer;
    use crate::error::RetouchError;
    use crate::filters::{
        self, blur, color_adjust, edge, levels, sharpen as sharpen_mod, stylize, RegionMask,
    };
    use crate::params::{FilterParams, ParamField};

    impl From<RetouchError> for PyErr {
        fn from(err: RetouchError) -> Self {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_buffer(image: &PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        Ok(PixelBuffer::from_array(image.as_array().to_owned())?)
    }

    fn to_numpy<'py>(py: Python<'py>, buffer: PixelBuffer) -> Bound<'py, PyArray3<u8>> {
        buffer.into_array().into_pyarray(py)
    }

    /// Run a filter with the GIL released.
    fn run<'py, F>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        edit_half: bool,
        filter: F,
    ) -> PyResult<Bound<'py, PyArray3<u8>>>
    where
        F: FnOnce(&PixelBuffer, RegionMask) -> PixelBuffer + Send,
    {
        let input = to_buffer(&image)?;
        let mask = RegionMask::new(edit_half);
        let result = py.allow_threads(|| filter(&input, mask));
        Ok(to_numpy(py, result))
    }

    // ========================================================================
    // Color Adjustment Filters
    // ========================================================================

    /// Invert R, G and B; alpha is kept.
    #[pyfunction]
    #[pyo3(signature = (image, edit_half=false))]
    pub fn invert<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, edit_half, color_adjust::invert)
    }

    /// Scale channels by `1 + amount`, amount in -1.0..=1.0.
    #[pyfunction]
    #[pyo3(signature = (image, amount, edit_half=false))]
    pub fn brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: f32,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let amount = ParamField::Brightness.validate(amount)?;
        run(py, image, edit_half, |b, m| color_adjust::brightness(b, m, amount))
    }

    /// Contrast around mid-gray with factor `contrast²`, contrast in 0.5..=2.0.
    #[pyfunction]
    #[pyo3(signature = (image, contrast, edit_half=false))]
    pub fn contrast<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        contrast: f32,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let contrast = ParamField::Contrast.validate(contrast)?;
        run(py, image, edit_half, |b, m| color_adjust::contrast(b, m, contrast))
    }

    // ========================================================================
    // Levels
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, offset_bottom=0, offset_top=0, edit_half=false))]
    pub fn histogram_correction<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        offset_bottom: u32,
        offset_top: u32,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        ParamField::HistogramOffsetBottom.validate(offset_bottom as f32)?;
        ParamField::HistogramOffsetTop.validate(offset_top as f32)?;
        run(py, image, edit_half, |b, m| {
            levels::histogram_correction(b, m, offset_bottom, offset_top)
        })
    }

    /// 256-bucket luminance histogram of the whole image.
    #[pyfunction]
    pub fn histogram(py: Python<'_>, image: PyReadonlyArray3<'_, u8>) -> PyResult<Vec<u32>> {
        let input = to_buffer(&image)?;
        Ok(py.allow_threads(|| filters::compute_histogram(&input)).to_vec())
    }

    // ========================================================================
    // One-shot Filters
    // ========================================================================

    /// 5x5 box blur; border windows shrink to the pixels inside the image.
    #[pyfunction]
    #[pyo3(signature = (image, edit_half=false))]
    pub fn box_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, edit_half, blur::box_blur)
    }

    #[pyfunction]
    #[pyo3(signature = (image, edit_half=false))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, edit_half, sharpen_mod::sharpen)
    }

    #[pyfunction]
    #[pyo3(signature = (image, edit_half=false))]
    pub fn emboss<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, edit_half, stylize::emboss)
    }

    #[pyfunction]
    #[pyo3(signature = (image, edit_half=false))]
    pub fn contour<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, edit_half, edge::contour)
    }

    // ========================================================================
    // Live Pipeline
    // ========================================================================

    /// Histogram stretch, brightness and contrast in pipeline order.
    #[pyfunction]
    #[pyo3(signature = (
        image,
        brightness=crate::params::DEFAULT_BRIGHTNESS,
        contrast=crate::params::DEFAULT_CONTRAST,
        histogram_offset_bottom=0.0,
        histogram_offset_top=0.0,
        edit_half=false,
    ))]
    pub fn apply_all<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        brightness: f32,
        contrast: f32,
        histogram_offset_bottom: f32,
        histogram_offset_top: f32,
        edit_half: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let params = FilterParams::default()
            .with(ParamField::Brightness, brightness)?
            .with(ParamField::Contrast, contrast)?
            .with(ParamField::HistogramOffsetBottom, histogram_offset_bottom)?
            .with(ParamField::HistogramOffsetTop, histogram_offset_top)?;
        run(py, image, edit_half, |b, m| filters::apply_all(&params, b, m))
    }

    /// Python module definition
    #[pymodule]
    pub fn retouch(m: &Bound<'_, PyModule>) -> PyResult<()> {
        crate::logging::init();

        // Color adjustment filters
        m.add_function(wrap_pyfunction!(invert, m)?)?;
        m.add_function(wrap_pyfunction!(brightness, m)?)?;
        m.add_function(wrap_pyfunction!(contrast, m)?)?;

        // Levels
        m.add_function(wrap_pyfunction!(histogram_correction, m)?)?;
        m.add_function(wrap_pyfunction!(histogram, m)?)?;

        // One-shot filters
        m.add_function(wrap_pyfunction!(box_blur, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(emboss, m)?)?;
        m.add_function(wrap_pyfunction!(contour, m)?)?;

        // Pipeline
        m.add_function(wrap_pyfunction!(apply_all, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::retouch;
