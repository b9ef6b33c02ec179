//! Configuration for loading and cleaning.
//!
//! - [`EnvConfig`] - values sourced from the process environment
//! - [`CleanerConfig`] - named options attached to a [`crate::DataCleaner`]
//! - [`CsvOptions`] - decoding and delimiter settings for the parser

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Environment variable holding the CSV file name.
pub const DATA_FILE_NAME: &str = "DATA_FILE_NAME";

/// Base directory searched by [`crate::DataCleaner::from_csv`] when none is given.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Encoding used when none is configured.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Field delimiter used when none is configured.
pub const DEFAULT_DELIMITER: u8 = b',';

// =============================================================================
// Environment
// =============================================================================

/// Settings read from the environment.
///
/// | Env Var          | Default |
/// |------------------|---------|
/// | `DATA_FILE_NAME` | none    |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// File name of the sales CSV, relative to the data directory.
    pub data_file_name: Option<String>,
}

impl EnvConfig {
    /// Read the current environment. Nothing is cached between calls.
    pub fn from_env() -> Self {
        let data_file_name = std::env::var(DATA_FILE_NAME)
            .ok()
            .filter(|s| !s.trim().is_empty());

        Self { data_file_name }
    }

    /// File name, or the error naming the missing variable.
    pub fn require_data_file_name(&self) -> Result<&str, ConfigError> {
        self.data_file_name
            .as_deref()
            .ok_or(ConfigError::MissingVariable(DATA_FILE_NAME))
    }
}

// =============================================================================
// Cleaner options
// =============================================================================

/// Named options attached to a cleaner at construction.
///
/// Recognised keys:
///
/// - `encoding` - text encoding of the source CSV.
/// - `delimiter` - field separator of the source CSV: one ASCII character,
///   or `tab` / `\t`.
/// - `label` - free-form run name, shown in logs.
///
/// `encoding` and `delimiter` are consumed by the CSV constructors and never
/// reach the cleaner.
///
/// Any other key lands in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CleanerConfig {
    /// Build from `key=value`-style pairs.
    ///
    /// Values for `extra` keys are parsed as JSON when they parse, and kept
    /// as plain strings otherwise.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            config.set(key.into(), value.into());
        }
        config
    }

    /// Set one option by key.
    pub fn set(&mut self, key: String, value: String) {
        match key.as_str() {
            "encoding" => self.encoding = Some(value),
            "delimiter" => self.delimiter = Some(value),
            "label" => self.label = Some(value),
            _ => {
                let parsed = serde_json::from_str(&value).unwrap_or(Value::String(value));
                self.extra.insert(key, parsed);
            }
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// True when no option at all was given.
    pub fn is_empty(&self) -> bool {
        self.encoding.is_none()
            && self.delimiter.is_none()
            && self.label.is_none()
            && self.extra.is_empty()
    }

    /// Remove and return the encoding, falling back to UTF-8.
    pub fn take_encoding(&mut self) -> String {
        self.encoding
            .take()
            .unwrap_or_else(|| DEFAULT_ENCODING.to_string())
    }

    /// Remove the loader options (`encoding`, `delimiter`) and turn them into
    /// [`CsvOptions`].
    pub fn take_csv_options(&mut self) -> Result<CsvOptions, ConfigError> {
        let delimiter = match self.delimiter.take() {
            Some(raw) => parse_delimiter(&raw)?,
            None => DEFAULT_DELIMITER,
        };

        Ok(CsvOptions::default()
            .with_encoding(self.take_encoding())
            .with_delimiter(delimiter))
    }
}

fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match raw.as_bytes() {
            [byte] if byte.is_ascii() && !matches!(byte, b'"' | b'\n' | b'\r') => Ok(*byte),
            _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
        },
    }
}

// =============================================================================
// CSV options
// =============================================================================

/// How to decode and split a CSV payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Encoding label (`utf-8`, `latin1`, `windows-1252`, ...) or `auto`.
    pub encoding: String,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl CsvOptions {
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}
