//! Workbook loading.
//!
//! Spreadsheet formats go through calamine and keep every cell as text: the
//! first non-empty row is the header and empty cells become nulls. Blank
//! strings stay strings. CSV files go
//! through the Polars reader with schema inference and load as a single sheet
//! named after the file stem.

use std::collections::BTreeSet;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, TimeDelta};
use polars::prelude::{Column, CsvReadOptions, DataFrame, IntoColumn, NamedFrom, SerReader, Series};
use sheetops_common::format_numeric;
use tracing::{debug, info, info_span};

use crate::error::{IngestError, Result};
use crate::workbook::{Sheet, Workbook};

/// Extensions read through calamine.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Lowercased file extension, or an empty string.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Load every sheet of a workbook file.
///
/// # Errors
///
/// Fails when the file is missing, the format is unsupported, a sheet cannot
/// be parsed, or the workbook has no sheets.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    let span = info_span!("load_workbook", path = %path.display());
    let _guard = span.enter();

    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let extension = extension_of(path);
    let workbook = if extension == "csv" {
        read_csv_workbook(path)?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path)?
    } else {
        return Err(IngestError::UnsupportedFormat {
            extension,
            path: path.to_path_buf(),
        });
    };

    if workbook.is_empty() {
        return Err(IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    }
    for sheet in workbook.sheets() {
        let (rows, columns) = sheet.shape();
        debug!(sheet = %sheet.name, rows, columns, "loaded sheet");
    }
    info!(sheet_count = workbook.len(), "loaded workbook");
    Ok(workbook)
}

/// Read a CSV file as a one-sheet workbook.
pub fn read_csv_workbook(path: &Path) -> Result<Workbook> {
    let data = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Sheet1");
    Ok(Workbook::new()
        .with_source(path)
        .with_sheet(Sheet::new(name, data)))
}

/// Read every sheet of an xlsx/xls/ods file.
pub fn read_spreadsheet(path: &Path) -> Result<Workbook> {
    let spreadsheet_error = |message: String| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };
    let mut spreadsheet = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let mut workbook = Workbook::new().with_source(path);
    for name in spreadsheet.sheet_names() {
        let range = spreadsheet
            .worksheet_range(&name)
            .map_err(|e| spreadsheet_error(format!("sheet '{name}': {e}")))?;
        let rows: Vec<Vec<Option<String>>> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        let data = frame_from_rows(&rows)?;
        workbook.insert(Sheet::new(name, data));
    }
    Ok(workbook)
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(text) => Some(text.clone()),
        Data::Float(value) => Some(format_numeric(*value)),
        Data::Int(value) => Some(value.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(value) => Some(excel_serial_to_string(value.as_f64())),
        other => Some(other.to_string()),
    }
}

/// Render an Excel serial date (days since 1899-12-30) as ISO text.
fn excel_serial_to_string(serial: f64) -> String {
    let whole_days = serial.trunc();
    let seconds = ((serial - whole_days) * 86_400.0).round() as i64;
    let datetime = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_days(whole_days as i64))
        .and_then(|(epoch, days)| epoch.checked_add_signed(days))
        .zip(TimeDelta::try_seconds(seconds))
        .and_then(|(date, time)| date.checked_add_signed(time));
    match datetime {
        Some(datetime) if seconds == 0 => datetime.format("%Y-%m-%d").to_string(),
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_numeric(serial),
    }
}

fn is_blank_row(row: &[Option<String>]) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().is_none_or(|value| value.trim().is_empty()))
}

/// Make header names non-empty and unique, in column order.
fn unique_headers(raw: &[Option<String>], width: usize) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut headers = Vec::with_capacity(width);
    for idx in 0..width {
        let base = raw
            .get(idx)
            .and_then(|cell| cell.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| format!("Column {}", idx + 1), str::to_string);
        let mut name = base.clone();
        let mut suffix = 2;
        while seen.contains(&name) {
            name = format!("{base} ({suffix})");
            suffix += 1;
        }
        seen.insert(name.clone());
        headers.push(name);
    }
    headers
}

/// Build a string DataFrame from raw rows.
///
/// Leading blank rows are skipped, the next row becomes the header, and short
/// rows are padded with nulls.
pub fn frame_from_rows(rows: &[Vec<Option<String>>]) -> Result<DataFrame> {
    let Some(header_index) = rows.iter().position(|row| !is_blank_row(row)) else {
        return Ok(DataFrame::empty());
    };
    let body = &rows[header_index + 1..];
    let width = rows[header_index..]
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or_default();
    let headers = unique_headers(&rows[header_index], width);

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let values: Vec<Option<String>> = body
                .iter()
                .map(|row| row.get(idx).cloned().flatten())
                .collect();
            Series::new(header.as_str().into(), values).into_column()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| (!v.is_empty()).then(|| (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(excel_serial_to_string(45505.0), "2024-08-01");
        assert_eq!(excel_serial_to_string(45505.5), "2024-08-01 12:00:00");
    }

    #[test]
    fn test_headers_are_unique_and_named() {
        let headers = unique_headers(&cells(&["Insurance", "", "Insurance"]), 4);
        assert_eq!(
            headers,
            vec!["Insurance", "Column 2", "Insurance (2)", "Column 4"]
        );
    }

    #[test]
    fn test_frame_skips_leading_blank_rows() {
        let rows = vec![
            cells(&["", ""]),
            cells(&["Patient ID", "Insurance"]),
            cells(&["1", "Aetna"]),
            cells(&["2"]),
        ];
        let df = frame_from_rows(&rows).expect("frame");
        assert_eq!(df.shape(), (2, 2));
        let insurance = df.column("Insurance").expect("column").str().expect("str");
        assert_eq!(insurance.get(0), Some("Aetna"));
        assert_eq!(insurance.get(1), None);
    }

    #[test]
    fn test_blank_string_cells_are_not_null() {
        assert_eq!(cell_to_string(&Data::String("   ".to_string())), Some("   ".to_string()));
        assert_eq!(cell_to_string(&Data::Empty), None);

        let rows = vec![
            cells(&["Insurance"]),
            vec![Some("  ".to_string())],
            vec![None],
        ];
        let df = frame_from_rows(&rows).expect("frame");
        let insurance = df.column("Insurance").expect("column").str().expect("str");
        assert_eq!(insurance.get(0), Some("  "));
        assert_eq!(insurance.get(1), None);
    }

    #[test]
    fn test_frame_from_blank_rows_is_empty() {
        let df = frame_from_rows(&[cells(&["", ""])]).expect("frame");
        assert_eq!(df.width(), 0);
    }
}
