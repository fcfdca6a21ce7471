//! Error types for the Starmill warehouse pipeline.
//!
//! - [`CsvError`] - raw extract loading errors
//! - [`TableError`] - missing tables/columns during transformation
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Loading Errors
// =============================================================================

/// Errors while loading a raw CSV extract.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Empty file.
    #[error("CSV file is empty: {0}")]
    EmptyFile(String),

    /// No headers found.
    #[error("No headers found in CSV: {0}")]
    NoHeaders(String),
}

// =============================================================================
// Table Errors
// =============================================================================

/// Errors raised by table operations inside the builders.
#[derive(Debug, Error)]
pub enum TableError {
    /// A builder needs a raw table that was not loaded.
    #[error("Missing raw table: {0}")]
    MissingTable(String),

    /// A builder needs a column the source table does not have.
    #[error("Missing column '{column}' in table '{table}'")]
    MissingColumn { table: String, column: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raw extract loading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Table operation error.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// IO error while writing warehouse output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization error.
    #[error("Output error: {0}")]
    Output(#[from] csv::Error),

    /// The input directory contained no CSV files.
    #[error("No raw tables found in '{0}'")]
    NoRawTables(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV loading operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
