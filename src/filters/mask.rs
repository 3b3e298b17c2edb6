//! Region mask: restricts a transform to part of the image.

/// Decides which columns a filter may touch.
///
/// With `edit_half` set only the right half participates: columns
/// `x > width / 2` (integer division). Every other column is copied from the
/// input unchanged. All filters share this single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionMask {
    pub edit_half: bool,
}

impl RegionMask {
    /// Every pixel participates.
    pub const FULL: RegionMask = RegionMask { edit_half: false };
    /// Only columns right of `width / 2` participate.
    pub const RIGHT_HALF: RegionMask = RegionMask { edit_half: true };

    pub fn new(edit_half: bool) -> Self {
        Self { edit_half }
    }

    #[inline]
    pub fn participates(self, x: usize, width: usize) -> bool {
        !self.edit_half || x > width / 2
    }
}
