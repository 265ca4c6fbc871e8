//! Scan command - classify the pages of a single PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use pagescan_core::export::{to_csv_string, to_json};
use pagescan_core::{
    CancelToken, ExtractionBackend, PagescanConfig, PdfDocument, ProgressError, ProgressSink,
    ScanReport, Scanner,
};

use super::config::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Minimum characters for a page to count as having text
    #[arg(short, long)]
    min_chars: Option<usize>,

    /// First page to analyze (1-indexed)
    #[arg(long, value_name = "PAGE")]
    from: Option<u32>,

    /// Last page to analyze (1-indexed, inclusive)
    #[arg(long, value_name = "PAGE")]
    to: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the per-page CSV to this file
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Password for encrypted PDFs
    #[arg(long)]
    password: Option<String>,

    /// Text extraction backend
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary and per-page table
    Text,
    /// Full report as JSON
    Json,
    /// Per-page CSV
    Csv,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum BackendArg {
    /// lopdf per-page extraction
    Lopdf,
    /// pdf-extract whole-document extraction
    PdfExtract,
    /// lopdf with pdf-extract fallback
    Auto,
}

impl From<BackendArg> for ExtractionBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Lopdf => ExtractionBackend::Lopdf,
            BackendArg::PdfExtract => ExtractionBackend::PdfExtract,
            BackendArg::Auto => ExtractionBackend::Auto,
        }
    }
}

impl ScanArgs {
    /// Fold command-line overrides into the loaded configuration.
    fn apply(&self, config: &mut PagescanConfig) {
        if let Some(min_chars) = self.min_chars {
            config.scan.min_chars = min_chars;
        }
        if let Some(password) = &self.password {
            config.pdf.password = password.clone();
        }
        if let Some(backend) = self.backend {
            config.pdf.backend = backend.into();
        }
    }

    /// The requested 1-indexed range. A missing bound extends to the
    /// document edge.
    fn requested_range(&self) -> Option<(u32, u32)> {
        match (self.from, self.to) {
            (None, None) => None,
            (from, to) => Some((from.unwrap_or(1), to.unwrap_or(u32::MAX))),
        }
    }
}

/// Forwards scan progress to a terminal progress bar.
struct BarProgress {
    pb: ProgressBar,
}

impl ProgressSink for BarProgress {
    fn report(&mut self, current: u32, total: u32) -> Result<(), ProgressError> {
        self.pb.set_length(total as u64);
        self.pb.set_position(current as u64);
        self.pb.set_message(format!("Analyzing pages... {}/{}", current, total));
        Ok(())
    }
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.apply(&mut config);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning file: {}", args.input.display());

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
                .progress_chars("##-"),
        );
        pb
    };
    pb.set_message("Loading PDF...");

    // Ctrl-C stops the scan at the next page boundary
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handler_token.cancel();
        }
    });

    let input = args.input.clone();
    let requested = args.requested_range();
    let scan_pb = pb.clone();
    let scan_config = config.clone();
    let report = tokio::task::spawn_blocking(move || -> anyhow::Result<ScanReport> {
        let document = PdfDocument::open(&input, &scan_config.pdf)
            .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", input.display(), e))?;

        let scanner = Scanner::from_config(&scan_config.scan);
        let mut sink = BarProgress { pb: scan_pb };
        Ok(scanner.run(&document, requested, &mut sink, &cancel)?)
    })
    .await??;

    if report.is_complete() {
        pb.finish_with_message("Done");
    } else {
        pb.abandon_with_message("Cancelled");
        warn!(
            "Scan cancelled after {} pages",
            report.summary.total_pages_analyzed
        );
        eprintln!(
            "{} Scan cancelled: showing {} analyzed pages only",
            style("⚠").yellow(),
            report.summary.total_pages_analyzed
        );
    }

    let output = match args.format {
        OutputFormat::Text => format_text(&report),
        OutputFormat::Json => to_json(&report)?,
        OutputFormat::Csv => to_csv_string(&report.records)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    if let Some(csv_path) = &args.csv {
        fs::write(csv_path, to_csv_string(&report.records)?)?;
        println!(
            "{} CSV written to {}",
            style("✓").green(),
            csv_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn page_list(pages: &[u32]) -> String {
    if pages.is_empty() {
        "—".to_string()
    } else {
        pages
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn format_text(report: &ScanReport) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str("Summary\n");
    output.push_str(&format!(
        "  Pages analyzed: {} (pages {}-{} of {})\n",
        summary.total_pages_analyzed, report.first_page, report.last_page, report.document_pages
    ));
    output.push_str(&format!(
        "  With text (>= {} chars): {}\n",
        report.min_chars, summary.pages_with_text
    ));
    output.push_str(&format!("  Without text: {}\n", summary.pages_without_text));
    output.push_str(&format!(
        "  Pages with text: {}\n",
        page_list(&summary.pages_with_text_list)
    ));
    output.push_str(&format!(
        "  Pages without text: {}\n",
        page_list(&summary.pages_without_text_list)
    ));
    if !summary.failed_pages.is_empty() {
        output.push_str(&format!(
            "  Extraction failed: {}\n",
            page_list(&summary.failed_pages)
        ));
    }
    output.push('\n');

    output.push_str("Pages\n");
    output.push_str(&format!(
        "  {:>5}  {:<8}  {:>6}  {:>6}  {}\n",
        "page", "has_text", "chars", "words", "sample"
    ));
    for record in &report.records {
        let sample: String = record.text_sample.chars().take(60).collect();
        output.push_str(&format!(
            "  {:>5}  {:<8}  {:>6}  {:>6}  {}\n",
            record.page_number,
            if record.has_text { "yes" } else { "no" },
            record.char_count,
            record.word_count,
            sample
        ));
    }

    output
}
