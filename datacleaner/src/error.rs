//! Error types for the cleaning pipeline.
//!
//! One enum per layer:
//!
//! - [`CsvError`] - decoding and parsing a CSV payload
//! - [`ConfigError`] - process configuration lookups
//! - [`LoadError`] - building a dataset from a file on disk
//! - [`TransformError`] - column transformations on a loaded dataset
//! - [`CleanerError`] - top-level wrapper used by the CLI
//!
//! `From` implementations let `?` cross layer boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV decoding and parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the underlying source.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Unknown encoding label or undecodable content.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors from process-wide configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing configuration: environment variable {0} is not set")]
    MissingVariable(&'static str),

    /// The CSV delimiter is not a single ASCII character.
    #[error("Invalid delimiter '{0}': expected one ASCII character or 'tab'")]
    InvalidDelimiter(String),
}

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while building a dataset from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Configuration needed to locate the file is absent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The CSV path does not resolve to a file.
    #[error("File '{file}' not found in directory '{}'", .directory.display())]
    FileNotFound {
        file: String,
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but could not be decoded or parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors raised by column transformations.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// Required source column absent from the dataset.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Arithmetic attempted on a cell that is not a number.
    #[error("Non-numeric value in column '{column}' at row {row}: {value}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Everything a cleaning run can fail with.
#[derive(Debug, Error)]
pub enum CleanerError {
    /// Loading the dataset failed.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// A pipeline step failed.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}

impl From<ConfigError> for CleanerError {
    fn from(err: ConfigError) -> Self {
        CleanerError::Load(LoadError::Config(err))
    }
}

impl From<CsvError> for CleanerError {
    fn from(err: CsvError) -> Self {
        CleanerError::Load(LoadError::Csv(err))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for file loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for transformations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for a whole cleaning run.
pub type CleanerResult<T> = Result<T, CleanerError>;
