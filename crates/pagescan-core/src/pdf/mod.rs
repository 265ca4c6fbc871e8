//! PDF processing module.

mod extractor;

pub use extractor::PdfDocument;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A readable document whose pages can be checked for text.
///
/// Implementations only need read access; a scan borrows the source for its
/// whole duration and never mutates it.
pub trait PageSource {
    /// Get the number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract plain text from the page at `index` (0-indexed).
    fn extract_page_text(&self, index: u32) -> Result<String>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn extract_page_text(&self, index: u32) -> Result<String> {
        (**self).extract_page_text(index)
    }
}
