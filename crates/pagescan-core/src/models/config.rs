//! Configuration structures for the scan pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for pagescan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagescanConfig {
    /// Page classification configuration.
    pub scan: ScanConfig,

    /// PDF loading and text extraction configuration.
    pub pdf: PdfConfig,
}

/// Page classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Minimum trimmed character count for a page to count as "with text".
    ///
    /// Zero classifies every page, even an empty one, as having text.
    pub min_chars: usize,

    /// Maximum number of characters kept in each page's text sample.
    pub sample_chars: usize,

    /// Minimum time between two progress reports, in milliseconds.
    /// The last page is always reported.
    pub progress_interval_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_chars: 5,
            sample_chars: 200,
            progress_interval_ms: 50,
        }
    }
}

/// Text extraction backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionBackend {
    /// lopdf's per-page extractor.
    #[default]
    Lopdf,
    /// pdf-extract, run once over the whole document and split by page.
    /// If that run fails, each page is extracted on its own.
    PdfExtract,
    /// lopdf first, pdf-extract for pages lopdf fails on.
    Auto,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Text extraction backend.
    pub backend: ExtractionBackend,

    /// Password tried on encrypted documents (empty by default).
    pub password: String,
}

impl PagescanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
