//! Domain models for the cleaning pipeline.
//!
//! - [`Dataset`] - ordered rows keyed by column name, plus the header order
//! - [`Row`] - a single record
//!
//! Cells are [`serde_json::Value`]s: numbers for numeric columns, strings for
//! text columns and `Null` for empty cells.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;

use crate::error::{CsvResult, TransformError, TransformResult};

/// Unit price column.
pub const PRICE_COLUMN: &str = "preco_unitario";

/// Quantity sold column.
pub const QUANTITY_COLUMN: &str = "quantidade_vendida";

/// Derived revenue column.
pub const REVENUE_COLUMN: &str = "faturamento";

/// A single record, column name to cell.
pub type Row = Map<String, Value>;

static NULL: Value = Value::Null;

// =============================================================================
// Dataset
// =============================================================================

/// In-memory table of product sales records.
///
/// Row order is significant: derived columns are aligned with their sources
/// by position. No operation on a `Dataset` changes its row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from a header list and its rows.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Build a dataset column by column.
    ///
    /// Shorter columns are padded with nulls up to the longest one.
    ///
    /// ```
    /// use datacleaner::Dataset;
    /// use serde_json::json;
    ///
    /// let ds = Dataset::from_columns([
    ///     ("preco_unitario", vec![json!(10.0), json!(20.0)]),
    ///     ("quantidade_vendida", vec![json!(2), json!(5)]),
    /// ]);
    /// assert_eq!(ds.len(), 2);
    /// ```
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let columns: Vec<(String, Vec<Value>)> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();
        let len = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        let mut rows = vec![Row::new(); len];
        for (name, values) in &columns {
            for (i, row) in rows.iter_mut().enumerate() {
                row.insert(name.clone(), values.get(i).cloned().unwrap_or(Value::Null));
            }
        }

        let headers = columns.into_iter().map(|(name, _)| name).collect();
        Self { headers, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Cells of a column, in row order.
    ///
    /// Rows lacking the key yield `Null`.
    pub fn column(&self, name: &str) -> TransformResult<Vec<&Value>> {
        if !self.has_column(name) {
            return Err(TransformError::MissingColumn(name.to_string()));
        }
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(name).unwrap_or(&NULL))
            .collect())
    }

    /// Write a column, replacing it if it already exists.
    ///
    /// `values` must have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len(), "column length must match row count");

        if !self.has_column(name) {
            self.headers.push(name.to_string());
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(name.to_string(), value);
        }
    }

    /// Serialize as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> CsvResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(
                self.headers
                    .iter()
                    .map(|h| cell_to_field(row.get(h).unwrap_or(&NULL))),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Render a cell the way it is written back to CSV.
fn cell_to_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
