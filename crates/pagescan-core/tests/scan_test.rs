//! End-to-end scans over generated PDFs.

mod common;

use pagescan_core::export::{read_csv, to_csv_string};
use pagescan_core::{
    analyze, CancelToken, ExtractionBackend, NoProgress, PageSource, PdfConfig, PdfDocument,
    PdfError, ScanConfig, ScanStatus, Scanner,
};
use pretty_assertions::assert_eq;

use common::{build_pdf, build_pdf_without_media_box};

#[test]
fn test_scan_mixed_document() {
    let data = build_pdf(&[
        Some("Chapter one begins here"),
        None,
        Some("Chapter two continues"),
        None,
        Some("The end of the story"),
    ]);
    let document = PdfDocument::load(&data, &PdfConfig::default()).unwrap();

    let report = analyze(&document, 5, None).unwrap();

    assert_eq!(report.status, ScanStatus::Complete);
    assert_eq!(report.summary.total_pages_analyzed, 5);
    assert_eq!(report.summary.pages_with_text_list, vec![1, 3, 5]);
    assert_eq!(report.summary.pages_without_text_list, vec![2, 4]);
    assert!(report.records[0].text_sample.contains("Chapter one"));
    assert_eq!(report.records[1].char_count, 0);
}

#[test]
fn test_scan_reversed_range() {
    let pages: Vec<Option<&str>> = (0..10).map(|_| Some("Scanned with OCR layer")).collect();
    let data = build_pdf(&pages);
    let document = PdfDocument::load(&data, &PdfConfig::default()).unwrap();
    assert_eq!(document.page_count(), 10);

    let report = analyze(&document, 5, Some((8, 3))).unwrap();

    assert_eq!(
        report.records.iter().map(|r| r.page_number).collect::<Vec<_>>(),
        vec![3, 4, 5, 6, 7, 8]
    );
}

#[test]
fn test_scan_with_config_and_csv_round_trip() {
    let data = build_pdf(&[Some("Alpha beta gamma"), None, Some("Delta")]);
    let document = PdfDocument::load(&data, &PdfConfig::default()).unwrap();
    let config = ScanConfig {
        min_chars: 1,
        ..Default::default()
    };

    let report = Scanner::from_config(&config)
        .run(&document, None, &mut NoProgress, &CancelToken::new())
        .unwrap();

    let csv = to_csv_string(&report.records).unwrap();
    let parsed = read_csv(csv.as_bytes()).unwrap();

    assert_eq!(parsed.len(), report.records.len());
    for (row, record) in parsed.iter().zip(&report.records) {
        assert_eq!(row.page_number, record.page_number);
        assert_eq!(row.has_text, record.has_text);
        assert_eq!(row.char_count, record.char_count);
        assert_eq!(row.word_count, record.word_count);
    }
}

fn load_with(data: &[u8], backend: ExtractionBackend) -> PdfDocument {
    let config = PdfConfig {
        backend,
        ..Default::default()
    };
    PdfDocument::load(data, &config).unwrap()
}

#[test]
fn test_load_counts_pages() {
    let data = build_pdf(&[Some("Hello World"), None, Some("Third page")]);
    let document = PdfDocument::load(&data, &PdfConfig::default()).unwrap();
    assert_eq!(document.page_count(), 3);
    assert_eq!(document.backend(), ExtractionBackend::Lopdf);
}

#[test]
fn test_extract_page_text_lopdf() {
    let data = build_pdf(&[Some("Hello World"), None]);
    let document = PdfDocument::load(&data, &PdfConfig::default()).unwrap();

    let text = document.extract_page_text(0).unwrap();
    assert!(text.contains("Hello World"), "got {:?}", text);

    let blank = document.extract_page_text(1).unwrap();
    assert!(blank.trim().is_empty(), "got {:?}", blank);
}

#[test]
fn test_extract_page_out_of_range() {
    let data = build_pdf(&[Some("Only page")]);
    let document = PdfDocument::load(&data, &PdfConfig::default()).unwrap();

    let err = document.extract_page_text(1).unwrap_err();
    assert!(matches!(err, PdfError::InvalidPage(1)));
    assert!(err.is_page_level());
}

#[test]
fn test_load_rejects_empty_document() {
    let data = build_pdf(&[]);
    let err = PdfDocument::load(&data, &PdfConfig::default()).err().unwrap();
    assert!(matches!(err, PdfError::NoPages));
}

#[test]
fn test_pdf_extract_backend_classifies_pages() {
    let data = build_pdf(&[Some("Chapter one begins here"), None, Some("Closing words")]);
    let document = load_with(&data, ExtractionBackend::PdfExtract);

    let report = analyze(&document, 5, None).unwrap();

    assert_eq!(report.summary.pages_with_text_list, vec![1, 3]);
    assert_eq!(report.summary.pages_without_text_list, vec![2]);
    assert!(report.summary.failed_pages.is_empty());
    assert!(report.records[0].text_sample.contains("Chapter"), "got {:?}", report.records[0]);
    assert!(report.records[2].text_sample.contains("Closing"), "got {:?}", report.records[2]);
    assert_eq!(report.records[1].char_count, 0);
}

#[test]
fn test_pdf_extract_bad_page_does_not_fail_others() {
    let data = build_pdf_without_media_box(
        &[Some("First page is fine"), Some("Second page lost its box")],
        &[1],
    );
    let document = load_with(&data, ExtractionBackend::PdfExtract);

    let report = analyze(&document, 5, None).unwrap();

    assert_eq!(report.status, ScanStatus::Complete);
    assert_eq!(report.summary.pages_with_text_list, vec![1]);
    assert_eq!(report.summary.pages_without_text_list, vec![2]);
    assert_eq!(report.summary.failed_pages, vec![2]);
    assert!(report.records[0].text_sample.contains("First"), "got {:?}", report.records[0]);
}

#[test]
fn test_lopdf_ignores_missing_media_box() {
    let data = build_pdf_without_media_box(
        &[Some("First page is fine"), Some("Second page lost its box")],
        &[1],
    );
    let document = load_with(&data, ExtractionBackend::Lopdf);

    let report = analyze(&document, 5, None).unwrap();
    assert_eq!(report.summary.pages_with_text_list, vec![1, 2]);
}

#[test]
fn test_auto_backend_extracts_text() {
    let data = build_pdf(&[Some("Hello from page one"), None]);
    let document = load_with(&data, ExtractionBackend::Auto);

    let text = document.extract_page_text(0).unwrap();
    assert!(text.contains("Hello from page one"), "got {:?}", text);

    let report = analyze(&document, 5, None).unwrap();
    assert_eq!(report.summary.pages_with_text_list, vec![1]);
    assert_eq!(report.summary.pages_without_text_list, vec![2]);
}

#[test]
fn test_corrupt_document_fails_before_scanning() {
    let mut data = build_pdf(&[Some("Hello")]);
    data.truncate(20);

    let result = PdfDocument::load(&data, &PdfConfig::default());
    assert!(matches!(result, Err(PdfError::Parse(_))));
}
