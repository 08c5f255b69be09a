//! Integration tests for workbook loading and export.

use std::fs;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use sheetops_ingest::{IngestError, Sheet, Workbook, load_workbook, write_workbook};
use tempfile::TempDir;

fn appointments() -> DataFrame {
    let cols: Vec<Column> = vec![
        Series::new("Patient ID".into(), &[101i64, 102, 103]).into_column(),
        Series::new(
            "Insurance".into(),
            &[Some("Delta Dental of CA Ph#800"), None, Some("Cigna (Primary)")],
        )
        .into_column(),
    ];
    DataFrame::new(cols).unwrap()
}

#[test]
fn loads_csv_as_single_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("august.csv");
    fs::write(&path, "Patient ID,Insurance\n1,Aetna\n2,\n").unwrap();

    let workbook = load_workbook(&path).expect("load csv");
    assert_eq!(workbook.sheet_names(), vec!["august"]);
    let sheet = workbook.sheet("august").unwrap();
    assert_eq!(sheet.shape(), (2, 2));
    assert_eq!(workbook.source.as_deref(), Some(path.as_path()));
}

#[test]
fn xlsx_round_trip_keeps_sheets_and_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.xlsx");
    let workbook = Workbook::new()
        .with_sheet(Sheet::new("Consolidated", appointments()))
        .with_sheet(Sheet::new("Notes", appointments().head(Some(1))));

    write_workbook(&workbook, &path).expect("write xlsx");
    let loaded = load_workbook(&path).expect("load xlsx");

    assert_eq!(loaded.sheet_names(), vec!["Consolidated", "Notes"]);
    let sheet = loaded.sheet("Consolidated").unwrap();
    assert_eq!(sheet.shape(), (3, 2));
    let ids = sheet.data.column("Patient ID").unwrap().str().unwrap();
    assert_eq!(ids.get(0), Some("101"));
    let insurance = sheet.data.column("Insurance").unwrap().str().unwrap();
    assert_eq!(insurance.get(0), Some("Delta Dental of CA Ph#800"));
    assert_eq!(insurance.get(1), None);
    assert_eq!(insurance.get(2), Some("Cigna (Primary)"));
}

#[test]
fn csv_export_writes_first_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    let workbook = Workbook::new().with_sheet(Sheet::new("Consolidated", appointments()));

    write_workbook(&workbook, &path).expect("write csv");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("Patient ID,Insurance\n"));
    assert!(contents.contains("Cigna (Primary)"));
}

#[test]
fn long_csv_name_exports_to_xlsx() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("appointments_august_2024_consolidated_export.csv");
    fs::write(&csv, "Patient ID,Insurance\n1,Aetna\n").unwrap();
    let workbook = load_workbook(&csv).expect("load csv");
    assert_eq!(
        workbook.sheet_names(),
        vec!["appointments_august_2024_consolidated_export"]
    );

    let xlsx = dir.path().join("processed.xlsx");
    write_workbook(&workbook, &xlsx).expect("write xlsx");
    let loaded = load_workbook(&xlsx).expect("load xlsx");
    assert_eq!(loaded.sheet_names(), vec!["appointments_august_2024_consol"]);
    assert_eq!(loaded.sheets()[0].shape(), (1, 2));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_workbook(&dir.path().join("missing.xlsx")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();
    let err = load_workbook(&path).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));

    let workbook = Workbook::new().with_sheet(Sheet::new("A", appointments()));
    let err = write_workbook(&workbook, &dir.path().join("out.json")).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
}
