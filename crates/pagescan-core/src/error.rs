//! Error types for the pagescan-core library.

use thiserror::Error;

/// Errors related to PDF processing.
///
/// `Parse`, `Encrypted`, `NoPages` and `Io` are document-level failures and
/// abort an analysis before any page is processed. `TextExtraction` and
/// `InvalidPage` are only ever raised for a single page and are degraded to
/// empty text by the scanner.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to read the PDF file.
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF is encrypted and the configured password does not open it.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to extract text from a page.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Invalid page index requested.
    #[error("invalid page index: {0}")]
    InvalidPage(u32),
}

impl PdfError {
    /// Whether this error concerns a single page rather than the document.
    pub fn is_page_level(&self) -> bool {
        matches!(self, Self::TextExtraction(_) | Self::InvalidPage(_))
    }
}

/// Errors related to exporting or re-reading scan records.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while writing the export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row did not have the expected shape.
    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

/// A progress sink failed to accept an update.
///
/// Never propagated out of a scan.
#[derive(Error, Debug)]
#[error("progress sink failed: {0}")]
pub struct ProgressError(pub String);
