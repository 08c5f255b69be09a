//! Small DataFrame lookups shared by the operations.

use polars::prelude::{Column, DataFrame};

use crate::error::{Result, TransformError};

/// Column names in sheet order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|column| column.as_str() == name)
}

/// Look up a column, reporting the available names when it is missing.
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| TransformError::ColumnNotFound {
        column: name.to_string(),
        available: column_names(df).join(", "),
    })
}
