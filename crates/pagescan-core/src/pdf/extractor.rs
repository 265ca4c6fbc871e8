//! PDF loading and per-page text extraction using lopdf and pdf-extract.

use std::cell::OnceCell;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Mutex;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PageSource, Result};
use crate::error::PdfError;
use crate::models::config::{ExtractionBackend, PdfConfig};

/// An opened, decrypted, readable PDF.
pub struct PdfDocument {
    document: Document,
    raw_data: Vec<u8>,
    /// lopdf page numbers (1-indexed) in document order.
    page_numbers: Vec<u32>,
    backend: ExtractionBackend,
    /// Whole-document pdf-extract output, split by page. Filled on first use.
    pages_text: OnceCell<std::result::Result<Vec<String>, String>>,
}

impl PdfDocument {
    /// Load a PDF from bytes.
    ///
    /// Fails if the bytes do not parse, if the document is encrypted and the
    /// configured password does not open it, or if it has no pages.
    pub fn load(data: &[u8], config: &PdfConfig) -> Result<Self> {
        let mut document =
            Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt(&config.password).is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with configured password");

            // pdf-extract reads bytes, not the lopdf document
            let mut decrypted_data = Vec::new();
            document
                .save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!(
            "Loaded PDF with {} pages (backend: {:?})",
            page_numbers.len(),
            config.backend
        );

        Ok(Self {
            document,
            raw_data,
            page_numbers,
            backend: config.backend,
            pages_text: OnceCell::new(),
        })
    }

    /// Read and load a PDF file.
    pub fn open(path: &Path, config: &PdfConfig) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load(&data, config)
    }

    /// The extraction backend in use.
    pub fn backend(&self) -> ExtractionBackend {
        self.backend
    }

    fn extract_with_lopdf(&self, page_number: u32) -> Result<String> {
        trace!("lopdf: extracting page {}", page_number);
        self.document
            .extract_text(&[page_number])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_with_pdf_extract(&self, index: u32, page_number: u32) -> Result<String> {
        let pages = self.pages_text.get_or_init(|| {
            debug!("pdf-extract: extracting all pages");
            quietly(|| pdf_extract::extract_text_from_mem_by_pages(&self.raw_data))
        });

        match pages {
            Ok(pages) => {
                if let Some(text) = pages.get(index as usize) {
                    return Ok(text.clone());
                }
                debug!(
                    "pdf-extract returned {} pages, page {} missing",
                    pages.len(),
                    page_number
                );
            }
            Err(reason) => debug!("pdf-extract failed on the whole document: {}", reason),
        }

        self.extract_single_page(page_number)
    }

    /// Run pdf-extract over a copy of the document holding only `page_number`,
    /// so a malformed page elsewhere cannot fail this one.
    fn extract_single_page(&self, page_number: u32) -> Result<String> {
        trace!("pdf-extract: extracting page {} on its own", page_number);
        let others: Vec<u32> = self
            .page_numbers
            .iter()
            .copied()
            .filter(|&n| n != page_number)
            .collect();

        let mut single = self.document.clone();
        single.delete_pages(&others);

        let mut data = Vec::new();
        single.save_to(&mut data).map_err(|e| {
            PdfError::TextExtraction(format!("Failed to save page {}: {}", page_number, e))
        })?;

        quietly(|| pdf_extract::extract_text_from_mem(&data)).map_err(PdfError::TextExtraction)
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn extract_page_text(&self, index: u32) -> Result<String> {
        let page_number = *self
            .page_numbers
            .get(index as usize)
            .ok_or(PdfError::InvalidPage(index))?;

        match self.backend {
            ExtractionBackend::Lopdf => self.extract_with_lopdf(page_number),
            ExtractionBackend::PdfExtract => self.extract_with_pdf_extract(index, page_number),
            ExtractionBackend::Auto => with_fallback(self.extract_with_lopdf(page_number), || {
                debug!("lopdf failed on page {}, trying pdf-extract", page_number);
                self.extract_with_pdf_extract(index, page_number)
            }),
        }
    }
}

/// Use `fallback` when `primary` failed. If both fail, the primary error wins.
fn with_fallback(
    primary: Result<String>,
    fallback: impl FnOnce() -> Result<String>,
) -> Result<String> {
    primary.or_else(|err| fallback().map_err(|_| err))
}

/// Serializes panic hook swaps across threads.
static HOOK_LOCK: Mutex<()> = Mutex::new(());

/// Run `f`, turning both its error and any panic into a message.
///
/// pdf-extract panics on some malformed PDFs. The panic hook is silenced
/// while `f` runs so a caught panic does not print to stderr.
fn quietly<T, E: Display>(
    f: impl FnOnce() -> std::result::Result<T, E>,
) -> std::result::Result<T, String> {
    let _guard = HOOK_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked".to_string()),
    }
}
