//! Offset/limit windows for listing endpoints

use serde::Deserialize;

/// Maximum items per window
const MAX_LIMIT: u32 = 100;

/// Default items per window
const DEFAULT_LIMIT: u32 = 20;

/// A slice of an ordered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    /// Items to return (1..=100)
    pub limit: u32,
}

impl Window {
    /// Create a window; limit is clamped to 1..=100.
    pub fn new(offset: u64, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Half-open index range into an already ordered slice of `len` items.
    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(self.limit as usize).min(len);
        start..end
    }
}

impl Default for Window {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Query parameters for windowed listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowParams {
    pub offset: Option<u64>,
    pub limit: Option<u32>,
}

impl From<WindowParams> for Window {
    fn from(params: WindowParams) -> Self {
        Self::new(
            params.offset.unwrap_or(0),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}
