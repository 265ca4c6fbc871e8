//! Per-page records and scan summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification result for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed).
    pub page_number: u32,

    /// Whether the trimmed character count reached the threshold.
    pub has_text: bool,

    /// Characters in the trimmed page text.
    pub char_count: usize,

    /// Whitespace-delimited tokens in the trimmed page text.
    pub word_count: usize,

    /// Leading characters of the trimmed text, newlines replaced by spaces.
    pub text_sample: String,
}

/// Aggregate counts over the analyzed pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of pages classified.
    pub total_pages_analyzed: usize,

    /// Number of pages classified as having text.
    pub pages_with_text: usize,

    /// Number of pages classified as image-only.
    pub pages_without_text: usize,

    /// Page numbers (1-indexed, ascending) with text.
    pub pages_with_text_list: Vec<u32>,

    /// Page numbers (1-indexed, ascending) without text.
    pub pages_without_text_list: Vec<u32>,

    /// Page numbers whose extraction failed and were scored as empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_pages: Vec<u32>,
}

impl Summary {
    /// Fold one classified page into the summary.
    pub fn push(&mut self, record: &PageRecord, extraction_failed: bool) {
        if record.has_text {
            self.pages_with_text_list.push(record.page_number);
            self.pages_with_text = self.pages_with_text_list.len();
        } else {
            self.pages_without_text_list.push(record.page_number);
            self.pages_without_text = self.pages_without_text_list.len();
        }
        if extraction_failed {
            self.failed_pages.push(record.page_number);
        }
        self.total_pages_analyzed += 1;
    }
}

/// Whether a scan ran to the end of its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// Every page in the range was classified.
    Complete,
    /// The scan was cancelled; records cover a prefix of the range.
    Cancelled,
}

/// Full outcome of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Per-page records, ascending by page number.
    pub records: Vec<PageRecord>,

    /// Aggregate summary over `records`.
    pub summary: Summary,

    /// Completion status.
    pub status: ScanStatus,

    /// Threshold used for classification.
    pub min_chars: usize,

    /// First page of the normalized range (1-indexed).
    pub first_page: u32,

    /// Last page of the normalized range (1-indexed, inclusive).
    pub last_page: u32,

    /// Page count of the whole document.
    pub document_pages: u32,

    /// When the analysis started.
    pub analyzed_at: DateTime<Utc>,
}

impl ScanReport {
    /// Whether every page in the requested range was classified.
    pub fn is_complete(&self) -> bool {
        self.status == ScanStatus::Complete
    }
}
