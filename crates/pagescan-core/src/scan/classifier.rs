//! Per-page text classification and summary aggregation.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::progress::{CancelToken, NoProgress, ProgressSink, ProgressThrottle};
use super::range::PageRange;
use crate::error::PdfError;
use crate::models::config::ScanConfig;
use crate::models::report::{PageRecord, ScanReport, ScanStatus, Summary};
use crate::pdf::PageSource;

/// Outcome of probing one page for text.
///
/// A failed extraction is a soft failure: the page is scored as if it had
/// no text and the scan carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageExtraction {
    /// Text returned by the extractor (untrimmed).
    Text(String),
    /// The extractor failed for this page.
    Failed { reason: String },
}

impl PageExtraction {
    /// Wrap an extractor result.
    pub fn from_result(result: Result<String, PdfError>) -> Self {
        match result {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Failed {
                reason: e.to_string(),
            },
        }
    }

    /// The extracted text, or the empty string for a failed page.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Failed { .. } => "",
        }
    }

    /// Whether the extractor failed for this page.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Classifies pages as "with text" or "without text".
#[derive(Debug, Clone)]
pub struct Scanner {
    min_chars: usize,
    sample_chars: usize,
    progress_interval: Duration,
}

impl Scanner {
    /// Create a scanner with the given character threshold.
    pub fn new(min_chars: usize) -> Self {
        let defaults = ScanConfig::default();
        Self {
            min_chars,
            sample_chars: defaults.sample_chars,
            progress_interval: Duration::from_millis(defaults.progress_interval_ms),
        }
    }

    /// Create a scanner from configuration.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.min_chars)
            .with_sample_chars(config.sample_chars)
            .with_progress_interval(Duration::from_millis(config.progress_interval_ms))
    }

    /// Set the maximum length of each page's text sample.
    pub fn with_sample_chars(mut self, sample_chars: usize) -> Self {
        self.sample_chars = sample_chars;
        self
    }

    /// Set the minimum time between progress reports.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// The character threshold.
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Build the record for one page.
    pub fn classify_page(&self, page_number: u32, extraction: &PageExtraction) -> PageRecord {
        let text = extraction.text().trim();
        let char_count = text.chars().count();
        let word_count = text.split_whitespace().count();

        PageRecord {
            page_number,
            has_text: char_count >= self.min_chars,
            char_count,
            word_count,
            text_sample: text
                .chars()
                .take(self.sample_chars)
                .collect::<String>()
                .replace('\n', " "),
        }
    }

    /// Normalize a 1-indexed request against `source` and scan it.
    ///
    /// Fails only for a document without pages.
    pub fn run<S: PageSource + ?Sized>(
        &self,
        source: &S,
        requested: Option<(u32, u32)>,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<ScanReport, PdfError> {
        let range = PageRange::normalize(source.page_count(), requested).ok_or(PdfError::NoPages)?;
        Ok(self.scan(source, range, progress, cancel))
    }

    /// Classify every page in `range`, in ascending order.
    ///
    /// Page extraction failures degrade to empty text. A cancelled scan
    /// returns the pages processed so far with [`ScanStatus::Cancelled`].
    pub fn scan<S: PageSource + ?Sized>(
        &self,
        source: &S,
        range: PageRange,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> ScanReport {
        let analyzed_at = Utc::now();
        let total = range.page_count();
        let (first_page, last_page) = range.to_page_numbers();

        info!(
            "Scanning pages {}-{} of {} (min_chars={})",
            first_page,
            last_page,
            source.page_count(),
            self.min_chars
        );

        let mut records = Vec::with_capacity(total as usize);
        let mut summary = Summary::default();
        let mut status = ScanStatus::Complete;
        let mut throttle = ProgressThrottle::new(self.progress_interval);

        for (processed, index) in (1..).zip(range.indices()) {
            if processed > 1 && cancel.is_cancelled() {
                info!("Scan cancelled after {} of {} pages", processed - 1, total);
                status = ScanStatus::Cancelled;
                break;
            }

            let page_number = index + 1;
            let extraction = PageExtraction::from_result(source.extract_page_text(index));
            if let PageExtraction::Failed { reason } = &extraction {
                warn!("Text extraction failed on page {}: {}", page_number, reason);
            }

            let record = self.classify_page(page_number, &extraction);
            debug!(
                "Page {}: {} chars, {} words, has_text={}",
                page_number, record.char_count, record.word_count, record.has_text
            );

            summary.push(&record, extraction.is_failed());
            records.push(record);

            if throttle.should_report(processed, total) {
                if let Err(e) = progress.report(processed, total) {
                    debug!("Ignoring progress sink error: {}", e);
                }
            }
        }

        info!(
            "Scanned {} pages: {} with text, {} without",
            summary.total_pages_analyzed, summary.pages_with_text, summary.pages_without_text
        );

        ScanReport {
            records,
            summary,
            status,
            min_chars: self.min_chars,
            first_page,
            last_page,
            document_pages: source.page_count(),
            analyzed_at,
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

/// Classify the pages of `source` within an optional 1-indexed inclusive
/// range, without progress reporting or cancellation.
pub fn analyze<S: PageSource + ?Sized>(
    source: &S,
    min_chars: usize,
    range: Option<(u32, u32)>,
) -> Result<ScanReport, PdfError> {
    Scanner::new(min_chars).run(source, range, &mut NoProgress, &CancelToken::new())
}
