//! # datacleaner - product sales cleaning
//!
//! Loads product sales CSVs, derives the revenue column and exposes a small
//! transformation pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│ DataCleaner │────▶│   Dataset   │
//! │ (UTF8/ISO)  │     │ (typed cols)│     │ (pipeline)  │     │ +faturamento│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use datacleaner::{CleanerConfig, DataCleaner, EnvConfig, DEFAULT_DATA_DIR};
//!
//! let env = EnvConfig::from_env();
//! let mut cleaner =
//!     DataCleaner::from_csv(DEFAULT_DATA_DIR, &env, Vec::new(), CleanerConfig::default())?;
//! let ds = cleaner.pipeline()?;
//! println!("{} rows", ds.len());
//! # Ok::<(), datacleaner::CleanerError>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Layered error types
//! - [`models`] - `Dataset` and column names
//! - [`config`] - Environment, cleaner and CSV options
//! - [`parser`] - CSV decoding and column typing
//! - [`transform`] - Revenue step and pipeline runner
//! - [`cleaner`] - `DataCleaner`
//! - [`generator`] - Synthetic sales data
//! - [`logging`] - Subscriber setup for binaries

// Core modules
pub mod error;
pub mod models;
pub mod config;

// Parsing
pub mod parser;

// Transformation
pub mod transform;
pub mod cleaner;

// Fixtures
pub mod generator;

pub mod logging;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CleanerError,
    CleanerResult,
    ConfigError,
    CsvError,
    LoadError,
    TransformError,
};

// =============================================================================
// Re-exports - Models & config
// =============================================================================

pub use models::{Dataset, Row, PRICE_COLUMN, QUANTITY_COLUMN, REVENUE_COLUMN};

pub use config::{
    CleanerConfig,
    CsvOptions,
    EnvConfig,
    DATA_FILE_NAME,
    DEFAULT_DATA_DIR,
    DEFAULT_DELIMITER,
    DEFAULT_ENCODING,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    csv_to_dataset,
    decode_content,
    detect_encoding,
    parse_bytes,
    parse_csv,
    parse_csv_file,
};

// =============================================================================
// Re-exports - Cleaner
// =============================================================================

pub use cleaner::DataCleaner;
pub use transform::{PipelineStep, DEFAULT_STEPS};
