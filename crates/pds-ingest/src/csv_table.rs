//! Raw CSV table reading with source-specific locale conventions.
//!
//! The Spanish statistical sources disagree on delimiter, decimal separator
//! and encoding: the air quality export is plain UTF-8/comma, while the INE
//! health and GDP files are semicolon-delimited latin1 with decimal commas.
//! [`ReadOptions`] captures those conventions per source so the rest of the
//! pipeline only ever sees trimmed UTF-8 cells.

use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;

/// Character encoding of a raw source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    /// Legacy single-byte encoding used by INE exports (latin1 superset).
    Latin1,
}

/// Per-source CSV conventions.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: u8,
    /// Numeric cells use ',' as the decimal separator.
    pub decimal_comma: bool,
    pub encoding: SourceEncoding,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            decimal_comma: false,
            encoding: SourceEncoding::Utf8,
        }
    }
}

impl ReadOptions {
    /// Conventions of the INE exports: semicolon, decimal comma, latin1.
    pub fn spanish_locale() -> Self {
        Self {
            delimiter: b';',
            decimal_comma: true,
            encoding: SourceEncoding::Latin1,
        }
    }
}

/// A raw delimited table: one header row plus data rows, all cells trimmed.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn decode(bytes: &[u8], encoding: SourceEncoding) -> String {
    match encoding {
        SourceEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        SourceEncoding::Latin1 => {
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Read a delimited file into a [`CsvTable`].
///
/// The file must exist and contain a header row; both are fatal otherwise.
pub fn read_csv_table(path: &Path, options: &ReadOptions) -> Result<CsvTable> {
    if !path.is_file() {
        bail!("required file not found: {}", path.display());
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let decoded = decode(&bytes, options.encoding);

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded.as_bytes());

    let mut records = reader.records();
    let header_record = match records.next() {
        Some(record) => record.with_context(|| format!("parse header of {}", path.display()))?,
        None => bail!("file has no header row: {}", path.display()),
    };
    let headers: Vec<String> = header_record.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for record in records {
        let record = record.with_context(|| format!("parse {}", path.display()))?;
        let mut row: Vec<String> = record.iter().map(normalize_cell).collect();
        // Flexible parsing can leave short rows; pad to the header width.
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}
