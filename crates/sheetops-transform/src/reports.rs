//! Read-only reports over a sheet.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{BooleanChunked, Column, DataFrame, NewChunkedArray};
use sheetops_common::{any_to_f64, column_optional_strings};
use sheetops_model::ColumnNames;

use crate::error::Result;
use crate::frame::{has_column, require_column};

/// Formats tried, in order, when reading date cells.
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d-%b-%Y"];

/// One distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Count, mean, min and max of a column whose values are all numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-column part of [`DatasetInfo`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub nulls: usize,
    pub numeric: Option<NumericStats>,
}

/// Shape, column types, missing values and numeric statistics of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

/// Earliest and latest value of a date column, as written in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub column: String,
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

/// Totals and top values over the well-known columns.
///
/// Each section is `None` when its column is absent from the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    pub records: usize,
    pub date_range: Option<DateRange>,
    pub unique_offices: Option<usize>,
    pub unique_providers: Option<usize>,
    pub unique_patients: Option<usize>,
    pub top_insurance: Option<Vec<ValueCount>>,
    pub top_offices: Option<Vec<ValueCount>>,
}

/// Distinct non-null values of `column`, most frequent first.
///
/// Ties are ordered by value. `limit` keeps only the first entries.
pub fn value_counts(df: &DataFrame, column: &str, limit: Option<usize>) -> Result<Vec<ValueCount>> {
    let values = column_optional_strings(require_column(df, column)?);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut counts: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    if let Some(limit) = limit {
        counts.truncate(limit);
    }
    Ok(counts)
}

/// Number of distinct non-null values in `column`.
pub fn unique_count(df: &DataFrame, column: &str) -> Result<usize> {
    let values = column_optional_strings(require_column(df, column)?);
    Ok(values.into_iter().flatten().collect::<BTreeSet<_>>().len())
}

/// Describe every column of the sheet.
pub fn describe(df: &DataFrame) -> DatasetInfo {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            let nulls = column.null_count();
            ColumnInfo {
                name: column.name().to_string(),
                dtype: column.dtype().to_string(),
                non_null: column.len() - nulls,
                nulls,
                numeric: numeric_stats(column),
            }
        })
        .collect();

    DatasetInfo {
        rows: df.height(),
        columns,
    }
}

/// Statistics for a column whose non-null cells all read as numbers.
///
/// Spreadsheet cells are loaded as text, so numeric-looking text counts.
fn numeric_stats(column: &Column) -> Option<NumericStats> {
    let mut numbers = Vec::new();
    for idx in 0..column.len() {
        let value = column.get(idx).ok()?;
        if value.is_null() {
            continue;
        }
        numbers.push(any_to_f64(value)?);
    }
    if numbers.is_empty() {
        return None;
    }

    let count = numbers.len();
    let sum: f64 = numbers.iter().sum();
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(NumericStats {
        count,
        mean: sum / count as f64,
        min,
        max,
    })
}

/// Read a date cell in any of the accepted formats.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Earliest and latest value of `column`.
///
/// Values are compared as dates when at least one parses; values that do not
/// parse are then ignored. Otherwise the text is compared as-is.
pub fn date_range(df: &DataFrame, column: &str) -> Result<DateRange> {
    let values: Vec<String> = column_optional_strings(require_column(df, column)?)
        .into_iter()
        .flatten()
        .filter(|value| !value.trim().is_empty())
        .collect();

    let dated: Vec<(NaiveDateTime, &String)> = values
        .iter()
        .filter_map(|value| parse_date(value).map(|date| (date, value)))
        .collect();

    let (earliest, latest) = if dated.is_empty() {
        (values.iter().min().cloned(), values.iter().max().cloned())
    } else {
        (
            dated.iter().min_by_key(|(date, _)| *date).map(|(_, v)| (*v).clone()),
            dated.iter().max_by_key(|(date, _)| *date).map(|(_, v)| (*v).clone()),
        )
    };

    Ok(DateRange {
        column: column.to_string(),
        earliest,
        latest,
    })
}

/// Rows whose `column` equals `value` exactly.
pub fn filter_equals(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame> {
    let values = column_optional_strings(require_column(df, column)?);
    let mask: Vec<bool> = values
        .iter()
        .map(|cell| cell.as_deref() == Some(value))
        .collect();
    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    Ok(df.filter(&mask)?)
}

/// Build the summary report, skipping sections whose column is absent.
pub fn summary(df: &DataFrame, columns: &ColumnNames, top: usize) -> Result<SummaryReport> {
    let present = |name: &str| has_column(df, name);

    let date_range = if present(&columns.appointment_date) {
        Some(date_range(df, &columns.appointment_date)?)
    } else {
        None
    };
    let unique = |name: &str| -> Result<Option<usize>> {
        if present(name) {
            unique_count(df, name).map(Some)
        } else {
            Ok(None)
        }
    };
    let top_values = |name: &str| -> Result<Option<Vec<ValueCount>>> {
        if present(name) {
            value_counts(df, name, Some(top)).map(Some)
        } else {
            Ok(None)
        }
    };

    Ok(SummaryReport {
        records: df.height(),
        date_range,
        unique_offices: unique(&columns.office)?,
        unique_providers: unique(&columns.provider)?,
        unique_patients: unique(&columns.patient)?,
        top_insurance: top_values(&columns.insurance)?,
        top_offices: top_values(&columns.office)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_date_layouts() {
        assert!(parse_date("2024-03-01").is_some());
        assert!(parse_date("2024-03-01 09:30:00").is_some());
        assert!(parse_date("03/01/2024").is_some());
        assert!(parse_date("next tuesday").is_none());
    }

    #[test]
    fn slash_dates_compare_chronologically() {
        let jan = parse_date("01/15/2024").unwrap();
        let dec = parse_date("12/01/2023").unwrap();
        assert!(dec < jan);
    }
}
