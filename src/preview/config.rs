//! Preview scheduler configuration.

use std::time::Duration;

/// Scale of the low-resolution buffer used while a slider is dragged.
pub const DEFAULT_FAST_SCALE: f32 = 0.3;

/// Quiet period before the full-resolution recompute is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Scheduler tuning. Production code uses `Default`; tests inject their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewConfig {
    /// Downsample factor for the fast buffer, in (0, 1]
    pub fast_scale: f32,
    /// Debounce interval for the full recompute
    pub debounce: Duration,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            fast_scale: DEFAULT_FAST_SCALE,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
