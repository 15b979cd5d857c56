//! Error types for loading and exporting the dataset.
//!
//! Aggregation never fails: empty or undefined results are values, not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while loading the source table.
///
/// Any of these aborts startup; there is no retry.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source file is missing or unreadable
    #[error("cannot read data source {path}: {source}")]
    Io {
        /// Path of the source file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a supported tabular format
    #[error("unsupported data source format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Workbook could not be opened or parsed
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Named sheet is not in the workbook
    #[error("sheet '{sheet}' not found (available: {available})")]
    SheetNotFound {
        /// Requested sheet name
        sheet: String,
        /// Sheet names present in the workbook
        available: String,
    },

    /// CSV parsing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Source has no header row
    #[error("data source has no header row")]
    Empty,

    /// A required column is absent from the header row
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    /// A numeric cell holds a non-numeric value
    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        /// 1-based data row number (header excluded)
        row: usize,
        /// Column name
        column: &'static str,
        /// Offending cell content
        value: String,
    },
}

/// Errors raised while serialising the CSV download.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failed
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Writer buffer could not be recovered
    #[error("CSV export failed: {0}")]
    Buffer(String),
}
