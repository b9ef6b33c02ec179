//! CSV to [`Dataset`] parser with encoding resolution and column typing.
//!
//! Every column is typed once for the whole file: integer if every non-blank
//! cell parses as `i64`, float if every non-blank cell parses as `f64`, text
//! otherwise. Numbers are read ignoring surrounding whitespace; text cells are
//! kept exactly as written. Empty cells become `Null` whatever the column type.
//!
//! `inf`/`NaN` cells in a float column have no JSON number form and load as
//! `Null`.

use encoding_rs::Encoding;
use serde_json::{Number, Value};
use std::io::Read;
use std::path::Path;

use crate::config::CsvOptions;
use crate::error::{CsvError, CsvResult};
use crate::models::{Dataset, Row};

/// Encoding label that asks for detection instead of a fixed charset.
pub const AUTO_ENCODING: &str = "auto";

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // chardet and WHATWG disagree on some names ("ascii" is windows-1252 for encoding_rs)
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Map an encoding label to an [`Encoding`], running detection for `auto`.
pub fn resolve_encoding(label: &str, bytes: &[u8]) -> CsvResult<&'static Encoding> {
    let label = if label.eq_ignore_ascii_case(AUTO_ENCODING) {
        let detected = detect_encoding(bytes);
        tracing::debug!(encoding = %detected, "Detected encoding");
        detected
    } else {
        label.trim().to_string()
    };

    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| CsvError::EncodingError(format!("unknown encoding '{label}'")))
}

/// Decode bytes to string using the given encoding label.
///
/// A leading BOM wins over the label. Malformed sequences are replaced with
/// U+FFFD and reported once as a warning.
pub fn decode_content(bytes: &[u8], label: &str) -> CsvResult<String> {
    let encoding = resolve_encoding(label, bytes)?;
    let (content, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = used.name(), "Replaced malformed byte sequences while decoding");
    }
    Ok(content.into_owned())
}

/// Parse CSV from a reader. The input must already be UTF-8.
pub fn parse_csv<R: Read>(reader: R, delimiter: u8) -> CsvResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(CsvError::EmptyFile);
    }

    // Cells past the header width are dropped, missing ones read as empty
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let cells = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        raw_rows.push(cells);
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|i| ColumnKind::infer(raw_rows.iter().map(|r| r[i].as_str())))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|cells| {
            headers
                .iter()
                .zip(&kinds)
                .zip(cells)
                .map(|((header, kind), cell)| (header.clone(), kind.convert(&cell)))
                .collect::<Row>()
        })
        .collect();

    Ok(Dataset::new(headers, rows))
}

/// Parse a CSV string with an explicit delimiter.
///
/// # Example
/// ```
/// use datacleaner::csv_to_dataset;
///
/// let csv = "produto,quantidade_vendida\nProduto_1,30\nProduto_2,25";
/// let ds = csv_to_dataset(csv, b',').unwrap();
///
/// assert_eq!(ds.len(), 2);
/// assert_eq!(ds.rows()[0]["produto"], "Produto_1");
/// assert_eq!(ds.rows()[0]["quantidade_vendida"], 30);
/// ```
pub fn csv_to_dataset(csv: &str, delimiter: u8) -> CsvResult<Dataset> {
    parse_csv(csv.as_bytes(), delimiter)
}

/// Decode then parse raw CSV bytes.
pub fn parse_bytes(bytes: &[u8], options: &CsvOptions) -> CsvResult<Dataset> {
    let content = decode_content(bytes, &options.encoding)?;
    parse_csv(content.as_bytes(), options.delimiter)
}

/// Read and parse a CSV file.
///
/// I/O failures, including a missing file, come back as [`CsvError::IoError`]
/// with the original [`std::io::ErrorKind`] intact.
pub fn parse_csv_file<P: AsRef<Path>>(path: P, options: &CsvOptions) -> CsvResult<Dataset> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, options)
}

// =============================================================================
// Column typing
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Integer;
        let mut seen = false;

        for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
            seen = true;
            if kind == ColumnKind::Integer && cell.parse::<i64>().is_err() {
                kind = ColumnKind::Float;
            }
            if kind == ColumnKind::Float && cell.parse::<f64>().is_err() {
                return ColumnKind::Text;
            }
        }

        if seen {
            kind
        } else {
            ColumnKind::Text
        }
    }

    fn convert(self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        let number = cell.trim();
        match self {
            ColumnKind::Integer => number
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::Null),
            ColumnKind::Float => number
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ColumnKind::Text => Value::String(cell.to_string()),
        }
    }
}
