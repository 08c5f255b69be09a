//! Canned operations over a sheet's `DataFrame`.
//!
//! - **insurance**: payer-name normalization of a column into a derived column
//! - **reports**: value counts, dataset description, date range, summary
//! - **executor**: maps an [`sheetops_model::Instruction`] to its handler

pub mod error;
pub mod executor;
pub mod frame;
pub mod insurance;
pub mod reports;

pub use error::{Result, TransformError};
pub use executor::{NO_INSURANCE, Outcome, ReformatReport, execute};
pub use frame::{column_names, has_column};
pub use insurance::{ColumnNormalizationSummary, copy_column, normalize_insurance_column};
pub use reports::{
    ColumnInfo, DatasetInfo, DateRange, NumericStats, SummaryReport, ValueCount, date_range,
    describe, filter_equals, parse_date, summary, unique_count, value_counts,
};
