//! Shared utilities for sheetops crates.
//!
//! This crate provides common utilities used across the sheetops workspace,
//! mostly helpers for reading spreadsheet cells out of Polars DataFrames.

pub mod cells;

// Re-export commonly used functions at crate root for convenience
pub use cells::{
    any_to_f64, any_to_optional_string, any_to_string, column_optional_strings, format_numeric,
    parse_f64,
};
