//! Page window limits applied to listing requests.

use memo_core::Page;

/// Bounds for listing page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Page size when the caller gives none
    pub default_size: usize,
    /// Largest page size a caller may ask for
    pub max_size: usize,
}

impl PageLimits {
    /// Create limits. `default_size` is capped at `max_size`.
    pub fn new(default_size: usize, max_size: usize) -> Self {
        Self {
            default_size: default_size.min(max_size),
            max_size,
        }
    }

    /// Turn an optional caller window into a concrete page.
    ///
    /// Zero or oversized limits are clamped into `1..=max_size`.
    pub fn clamp(&self, offset: Option<usize>, limit: Option<usize>) -> Page {
        let limit = limit
            .unwrap_or(self.default_size)
            .clamp(1, self.max_size.max(1));
        Page::new(offset.unwrap_or(0), limit)
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(20, 100)
    }
}
