//! Loading session options from JSON.

use std::fs;

use sheetops_model::{ModelError, SessionOptions};

#[test]
fn partial_json_keeps_defaults() {
    let options = SessionOptions::from_json_str(
        r#"{"preferred_sheet": "August", "columns": {"insurance": "Payer"}}"#,
    )
    .unwrap();
    assert_eq!(options.preferred_sheet, "August");
    assert_eq!(options.columns.insurance, "Payer");
    assert_eq!(options.columns.office, "Office Name");
    assert_eq!(options.columns.appointment_date, "Appoinment Date");
    assert_eq!(options.default_preview_rows, 10);
    assert_eq!(options.derived_column_name("Payer"), "Payer New");
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheetops.json");
    fs::write(&path, r#"{"default_preview_rows": 5, "summary_top_values": 3}"#).unwrap();

    let options = SessionOptions::from_json_file(&path).unwrap();
    assert_eq!(options.default_preview_rows, 5);
    assert_eq!(options.summary_top_values, 3);
    assert_eq!(options.sample_rows, 15);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let error = SessionOptions::from_json_file(&path).unwrap_err();
    assert!(matches!(error, ModelError::OptionsRead { .. }));
    assert!(error.to_string().contains("absent.json"));
}

#[test]
fn malformed_json_is_rejected() {
    let error = SessionOptions::from_json_str("{ not json").unwrap_err();
    assert!(matches!(error, ModelError::OptionsJson(_)));
}
