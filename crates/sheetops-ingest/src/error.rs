//! Error types for workbook loading and export.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing workbooks.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Workbook file not found.
    #[error("workbook not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to create an output file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a supported workbook format.
    #[error("unsupported workbook format '{extension}' for {path}")]
    UnsupportedFormat { extension: String, path: PathBuf },

    // === Parsing Errors ===
    /// Spreadsheet could not be opened or a sheet could not be read.
    #[error("failed to read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Workbook contains no sheets.
    #[error("workbook has no sheets: {path}")]
    EmptyWorkbook { path: PathBuf },

    // === Output Errors ===
    /// rust_xlsxwriter rejected the workbook or a cell.
    #[error("failed to write xlsx {path}: {source}")]
    XlsxWrite {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// Failed to write CSV with Polars.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Sheet not present in the workbook.
    #[error("sheet '{name}' not found")]
    SheetNotFound { name: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        IngestError::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
