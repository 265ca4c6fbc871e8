//! Core library for per-page PDF text detection.
//!
//! This crate provides:
//! - PDF loading and per-page text extraction (lopdf, pdf-extract)
//! - Page range normalization over a document's real page count
//! - Page classification ("has extractable text" vs "image-only") and summary aggregation
//! - CSV export of per-page records

pub mod error;
pub mod export;
pub mod models;
pub mod pdf;
pub mod scan;

pub use error::{ExportError, PdfError, ProgressError};
pub use models::config::{ExtractionBackend, PagescanConfig, PdfConfig, ScanConfig};
pub use models::report::{PageRecord, ScanReport, ScanStatus, Summary};
pub use pdf::{PageSource, PdfDocument};
pub use scan::{
    analyze, CancelToken, NoProgress, PageExtraction, PageRange, ProgressSink, Scanner,
};
