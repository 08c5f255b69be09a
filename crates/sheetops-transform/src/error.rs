//! Error types for sheet operations.

use thiserror::Error;

/// Errors raised while running an operation against a sheet.
///
/// The sheet is left unchanged whenever one of these is returned.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the operation needs is missing from the sheet.
    #[error("column '{column}' not found (available: {available})")]
    ColumnNotFound { column: String, available: String },

    /// A derived column would overwrite the column it is derived from.
    #[error("target column '{column}' is the same as the source column")]
    TargetIsSource { column: String },

    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
