//! Page range normalization.

use serde::{Deserialize, Serialize};

/// A normalized, 0-indexed, inclusive page range.
///
/// Always satisfies `start <= end < total_pages` for the document it was
/// normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Normalize an optional 1-indexed inclusive `(start, end)` request
    /// against a document of `total_pages` pages.
    ///
    /// Out-of-range bounds are clamped to the nearest page and reversed
    /// bounds are swapped, so any request yields at least one page. Returns
    /// `None` only for a document without pages.
    pub fn normalize(total_pages: u32, requested: Option<(u32, u32)>) -> Option<Self> {
        let last = total_pages.checked_sub(1)?;

        let Some((start, end)) = requested else {
            return Some(Self { start: 0, end: last });
        };

        let start = start.saturating_sub(1).min(last);
        let end = end.saturating_sub(1).min(last);

        if end < start {
            Some(Self { start: end, end: start })
        } else {
            Some(Self { start, end })
        }
    }

    /// First page index (0-indexed).
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last page index (0-indexed, inclusive).
    pub fn end(&self) -> u32 {
        self.end
    }

    /// The range as 1-indexed inclusive page numbers.
    pub fn to_page_numbers(&self) -> (u32, u32) {
        (self.start + 1, self.end + 1)
    }

    /// Number of pages in the range. Never zero.
    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Iterate the page indices in ascending order.
    pub fn indices(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}
