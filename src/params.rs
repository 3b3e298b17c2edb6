//! Live filter parameters and their store.
//!
//! `FilterParams` is a `Copy` snapshot; every update produces a new value so a
//! scheduler can compare the previous and the next snapshot by value.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{RetouchError, RetouchResult};

pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = -1.0..=1.0;
pub const CONTRAST_RANGE: RangeInclusive<f32> = 0.5..=2.0;
pub const HISTOGRAM_OFFSET_RANGE: RangeInclusive<f32> = 0.0..=100.0;

pub const DEFAULT_BRIGHTNESS: f32 = 0.0;
pub const DEFAULT_CONTRAST: f32 = 1.25;

/// A single adjustable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    Brightness,
    Contrast,
    HistogramOffsetBottom,
    HistogramOffsetTop,
}

impl ParamField {
    pub const ALL: [ParamField; 4] = [
        ParamField::Brightness,
        ParamField::Contrast,
        ParamField::HistogramOffsetBottom,
        ParamField::HistogramOffsetTop,
    ];

    /// Inclusive range a value for this field must fall into.
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            ParamField::Brightness => BRIGHTNESS_RANGE,
            ParamField::Contrast => CONTRAST_RANGE,
            ParamField::HistogramOffsetBottom | ParamField::HistogramOffsetTop => {
                HISTOGRAM_OFFSET_RANGE
            }
        }
    }

    /// Reject NaN and values outside `range()`.
    pub fn validate(self, value: f32) -> RetouchResult<f32> {
        let range = self.range();
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(RetouchError::OutOfRangeParameter {
                field: self,
                value,
                min: *range.start(),
                max: *range.end(),
            })
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamField::Brightness => "brightness",
            ParamField::Contrast => "contrast",
            ParamField::HistogramOffsetBottom => "histogram_offset_bottom",
            ParamField::HistogramOffsetTop => "histogram_offset_top",
        };
        f.write_str(name)
    }
}

/// Immutable snapshot of the live adjustment parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// -1.0 (black) to 1.0 (double), 0.0 = no change
    pub brightness: f32,
    /// 0.5 to 2.0; the applied factor is the square
    pub contrast: f32,
    /// Number of dark levels clipped to black, 0-100
    pub histogram_offset_bottom: f32,
    /// Number of bright levels clipped to white, 0-100
    pub histogram_offset_top: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            contrast: DEFAULT_CONTRAST,
            histogram_offset_bottom: 0.0,
            histogram_offset_top: 0.0,
        }
    }
}

impl FilterParams {
    pub fn get(&self, field: ParamField) -> f32 {
        match field {
            ParamField::Brightness => self.brightness,
            ParamField::Contrast => self.contrast,
            ParamField::HistogramOffsetBottom => self.histogram_offset_bottom,
            ParamField::HistogramOffsetTop => self.histogram_offset_top,
        }
    }

    /// Return a copy with `field` set to `value`, or an error if the value is
    /// outside the field's range.
    pub fn with(self, field: ParamField, value: f32) -> RetouchResult<Self> {
        let value = field.validate(value)?;
        let mut next = self;
        match field {
            ParamField::Brightness => next.brightness = value,
            ParamField::Contrast => next.contrast = value,
            ParamField::HistogramOffsetBottom => next.histogram_offset_bottom = value,
            ParamField::HistogramOffsetTop => next.histogram_offset_top = value,
        }
        Ok(next)
    }

    pub fn has_histogram_offsets(&self) -> bool {
        self.histogram_offset_bottom != 0.0 || self.histogram_offset_top != 0.0
    }
}

/// Holds the current parameter snapshot.
#[derive(Debug, Clone, Default)]
pub struct FilterParameterStore {
    current: FilterParams,
}

impl FilterParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> FilterParams {
        self.current
    }

    /// Validate and store a new value. On error the stored snapshot is kept.
    pub fn update(&mut self, field: ParamField, value: f32) -> RetouchResult<FilterParams> {
        self.current = self.current.with(field, value)?;
        Ok(self.current)
    }

    pub fn reset_all(&mut self) -> FilterParams {
        self.current = FilterParams::default();
        self.current
    }
}
