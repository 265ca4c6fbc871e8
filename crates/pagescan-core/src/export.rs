//! Export of per-page records.
//!
//! The CSV layout is a compatibility contract: header
//! `page,has_text,char_count,word_count,text_sample`, one row per page,
//! UTF-8, `\n` line endings, booleans spelled `True`/`False`.

use std::io;

use crate::error::ExportError;
use crate::models::report::{PageRecord, ScanReport};

/// CSV column names, in order.
pub const CSV_HEADER: [&str; 5] = ["page", "has_text", "char_count", "word_count", "text_sample"];

fn csv_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Write records as CSV with a header row.
pub fn write_csv<W: io::Write>(records: &[PageRecord], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;

    for record in records {
        wtr.write_record([
            record.page_number.to_string().as_str(),
            csv_bool(record.has_text),
            record.char_count.to_string().as_str(),
            record.word_count.to_string().as_str(),
            record.text_sample.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render records as a CSV string.
pub fn to_csv_string(records: &[PageRecord]) -> Result<String, ExportError> {
    let mut data = Vec::new();
    write_csv(records, &mut data)?;
    String::from_utf8(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Parse records back from CSV written by [`write_csv`].
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<PageRecord>, ExportError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?;
    if headers.iter().ne(CSV_HEADER) {
        return Err(ExportError::MalformedRow {
            row: 0,
            reason: format!("unexpected header: {:?}", headers),
        });
    }

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let line = i + 1;
        let field = |idx: usize| row.get(idx).unwrap_or_default();
        let malformed = |column: &str, value: &str| ExportError::MalformedRow {
            row: line,
            reason: format!("invalid {}: {:?}", column, value),
        };

        records.push(PageRecord {
            page_number: field(0).parse().map_err(|_| malformed("page", field(0)))?,
            has_text: parse_bool(field(1)).ok_or_else(|| malformed("has_text", field(1)))?,
            char_count: field(2).parse().map_err(|_| malformed("char_count", field(2)))?,
            word_count: field(3).parse().map_err(|_| malformed("word_count", field(3)))?,
            text_sample: field(4).to_string(),
        });
    }

    Ok(records)
}

/// Render a full report as pretty-printed JSON.
pub fn to_json(report: &ScanReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}
