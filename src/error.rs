//! Error types for the filter engine and the preview scheduler.

use thiserror::Error;

use crate::params::ParamField;

/// Errors surfaced to callers of the crate.
///
/// Filters themselves are total over well-formed buffers; these variants only
/// cover malformed input, rejected parameters and a stopped scheduler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetouchError {
    #[error("No source image available")]
    MissingInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("{field} out of range: {value} (allowed {min}..={max})")]
    OutOfRangeParameter {
        field: ParamField,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Preview scheduler is no longer running")]
    SchedulerClosed,
}

impl RetouchError {
    pub(crate) fn shape_mismatch(
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    ) -> Self {
        Self::DimensionMismatch {
            expected: format!("{}x{}x{}", expected.0, expected.1, expected.2),
            actual: format!("{}x{}x{}", actual.0, actual.1, actual.2),
        }
    }
}

/// Result type for crate operations
pub type RetouchResult<T> = Result<T, RetouchError>;
