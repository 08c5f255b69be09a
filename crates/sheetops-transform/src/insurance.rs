//! Insurance column normalization.
//!
//! Applies the payer canonicalizer element-wise to a sheet column and writes
//! the result to a separate column, leaving the source untouched.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use sheetops_common::column_optional_strings;
use sheetops_normalization::{MatchCategory, classify};

use crate::error::{Result, TransformError};
use crate::frame::require_column;

fn ensure_distinct(source: &str, target: &str) -> Result<()> {
    if source == target {
        return Err(TransformError::TargetIsSource {
            column: target.to_string(),
        });
    }
    Ok(())
}

/// Counts collected while normalizing one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNormalizationSummary {
    pub source: String,
    pub target: String,
    pub rows: usize,
    pub non_null: usize,
    /// How many non-null values fell into each match category.
    pub categories: BTreeMap<MatchCategory, usize>,
    /// Number of distinct non-null values written to the target column.
    pub distinct_outputs: usize,
}

impl ColumnNormalizationSummary {
    pub fn count(&self, category: MatchCategory) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }
}

/// Canonicalize every value of `source` into `target`.
///
/// Nulls stay null and row order is preserved. Non-string cells are read in
/// their string form. An existing `target` column is replaced; every other
/// column is left as it was. `target` must differ from `source`. On error the
/// frame is not modified.
pub fn normalize_insurance_column(
    df: &mut DataFrame,
    source: &str,
    target: &str,
) -> Result<ColumnNormalizationSummary> {
    ensure_distinct(source, target)?;
    let values = column_optional_strings(require_column(df, source)?);

    let mut categories: BTreeMap<MatchCategory, usize> = BTreeMap::new();
    let mut distinct: BTreeSet<String> = BTreeSet::new();
    let mut normalized: Vec<Option<String>> = Vec::with_capacity(values.len());
    let mut non_null = 0usize;

    for value in &values {
        let Some(raw) = value.as_deref() else {
            normalized.push(None);
            continue;
        };
        non_null += 1;
        let payer = classify(raw);
        *categories.entry(payer.category()).or_insert(0) += 1;
        let canonical = payer.into_canonical();
        distinct.insert(canonical.clone());
        normalized.push(Some(canonical));
    }

    let series = Series::new(target.into(), normalized);
    df.with_column(series.into_column())?;

    let summary = ColumnNormalizationSummary {
        source: source.to_string(),
        target: target.to_string(),
        rows: values.len(),
        non_null,
        categories,
        distinct_outputs: distinct.len(),
    };

    tracing::info!(
        source = %summary.source,
        target = %summary.target,
        rows = summary.rows,
        non_null = summary.non_null,
        sentinel = summary.count(MatchCategory::Sentinel),
        family = summary.count(MatchCategory::Family),
        fixed = summary.count(MatchCategory::Fixed),
        passthrough = summary.count(MatchCategory::Passthrough),
        distinct = summary.distinct_outputs,
        "normalized insurance column"
    );

    Ok(summary)
}

/// Copy `source` into a new column named `target`, replacing any existing one.
///
/// Returns the number of non-null values copied.
pub fn copy_column(df: &mut DataFrame, source: &str, target: &str) -> Result<usize> {
    ensure_distinct(source, target)?;
    let column = require_column(df, source)?.clone().with_name(target.into());
    let non_null = column.len() - column.null_count();
    df.with_column(column)?;
    tracing::debug!(source, target, non_null, "copied column");
    Ok(non_null)
}
