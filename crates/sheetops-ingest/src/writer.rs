//! Workbook export.
//!
//! `.xlsx` output writes every sheet, `.csv` output writes the first sheet.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use polars::prelude::{AnyValue, CsvWriter, DataFrame, DataType, SerWriter};
use rust_xlsxwriter::{Workbook as XlsxWorkbook, Worksheet, XlsxError};
use sheetops_common::{any_to_f64, any_to_optional_string};
use tracing::{debug, info, info_span};

use crate::error::{IngestError, Result};
use crate::reader::extension_of;
use crate::workbook::Workbook;

/// Write a workbook, choosing the format from the file extension.
pub fn write_workbook(workbook: &Workbook, path: &Path) -> Result<()> {
    let span = info_span!("export", path = %path.display());
    let _guard = span.enter();

    match extension_of(path).as_str() {
        "xlsx" => write_xlsx(workbook, path)?,
        "csv" => {
            let sheet = workbook.first().ok_or_else(|| IngestError::EmptyWorkbook {
                path: path.to_path_buf(),
            })?;
            write_csv(&sheet.data, path)?;
        }
        other => {
            return Err(IngestError::UnsupportedFormat {
                extension: other.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    info!(sheet_count = workbook.len(), "exported workbook");
    Ok(())
}

/// Write every sheet to an xlsx file, one worksheet per sheet.
pub fn write_xlsx(workbook: &Workbook, path: &Path) -> Result<()> {
    let xlsx_error = |source: XlsxError| IngestError::XlsxWrite {
        path: path.to_path_buf(),
        source,
    };
    let names = xlsx_sheet_names(workbook.sheets().iter().map(|sheet| sheet.name.as_str()));
    let mut output = XlsxWorkbook::new();
    for (sheet, name) in workbook.sheets().iter().zip(names) {
        if name != sheet.name {
            debug!(sheet = %sheet.name, worksheet = %name, "renamed sheet for xlsx");
        }
        let worksheet = output.add_worksheet();
        worksheet.set_name(name.as_str()).map_err(xlsx_error)?;
        write_sheet(worksheet, &sheet.data).map_err(xlsx_error)?;
    }
    output.save(path).map_err(xlsx_error)
}

/// Longest worksheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_SHEET_NAME_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Worksheet names Excel accepts, one per input name and in the same order.
///
/// Forbidden characters become `_`, surrounding apostrophes are dropped,
/// names are cut to [`MAX_SHEET_NAME_LEN`] characters, and names that clash
/// case-insensitively get a ` (n)` suffix.
pub fn xlsx_sheet_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cleaned: String = name
                .chars()
                .map(|ch| if INVALID_SHEET_NAME_CHARS.contains(&ch) { '_' } else { ch })
                .collect();
            let cleaned = cleaned.trim().trim_matches('\'');
            let base = match cleaned {
                "" => format!("Sheet{}", idx + 1),
                history if history.eq_ignore_ascii_case("history") => format!("{history}_"),
                other => other.to_string(),
            };

            let mut candidate = truncate_name(&base, MAX_SHEET_NAME_LEN);
            let mut suffix = 2;
            while !seen.insert(candidate.to_lowercase()) {
                let tag = format!(" ({suffix})");
                let keep = MAX_SHEET_NAME_LEN - tag.chars().count();
                candidate = format!("{}{tag}", truncate_name(&base, keep));
                suffix += 1;
            }
            candidate
        })
        .collect()
}

fn truncate_name(name: &str, max_chars: usize) -> String {
    let truncated: String = name.chars().take(max_chars).collect();
    truncated.trim_end_matches('\'').to_string()
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Header row, then one row per record. Nulls are left blank; numeric
/// columns are written as numbers and everything else as text.
fn write_sheet(worksheet: &mut Worksheet, data: &DataFrame) -> std::result::Result<(), XlsxError> {
    for (col_idx, column) in data.get_columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.write_string(0, col, column.name().as_str())?;
        let numeric = is_numeric(column.dtype());
        for row_idx in 0..column.len() {
            let row = u32::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            let value = column.get(row_idx).unwrap_or(AnyValue::Null);
            if numeric {
                if let Some(number) = any_to_f64(value) {
                    worksheet.write_number(row, col, number)?;
                }
            } else if let Some(text) = any_to_optional_string(value) {
                worksheet.write_string(row, col, text)?;
            }
        }
    }
    Ok(())
}

/// Write one sheet as CSV with a header row.
pub fn write_csv(data: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut frame = data.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
