//! Session behavior: sheet selection, history, mutation and export.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use sheetops_cli::session::{Session, SheetListing};
use sheetops_common::column_optional_strings;
use sheetops_ingest::{Sheet, Workbook, load_workbook};
use sheetops_model::SessionOptions;
use sheetops_transform::Outcome;

fn appointments(insurance: &[Option<&str>]) -> DataFrame {
    let offices: Vec<&str> = insurance.iter().map(|_| "North").collect();
    DataFrame::new(vec![
        Series::new("Office Name".into(), offices).into_column(),
        Series::new("Insurance".into(), insurance).into_column(),
    ])
    .unwrap()
}

fn workbook() -> Workbook {
    Workbook::new()
        .with_sheet(Sheet::new(
            "August",
            appointments(&[Some("Aetna"), Some("Humana Primary")]),
        ))
        .with_sheet(Sheet::new(
            "Consolidated",
            appointments(&[
                Some("Delta Dental of CA Ph#800-555-1234"),
                None,
                Some("BCBS TX (Primary)"),
            ]),
        ))
}

#[test]
fn starts_on_preferred_sheet() {
    let session = Session::new(workbook(), SessionOptions::default()).unwrap();
    assert_eq!(session.active_sheet(), "Consolidated");
}

#[test]
fn falls_back_to_first_sheet() {
    let options = SessionOptions::default().with_preferred_sheet("Missing");
    let session = Session::new(workbook(), options).unwrap();
    assert_eq!(session.active_sheet(), "August");
}

#[test]
fn empty_workbook_is_rejected() {
    assert!(Session::new(Workbook::new(), SessionOptions::default()).is_err());
}

#[test]
fn lists_sheets_with_active_flag() {
    let session = Session::new(workbook(), SessionOptions::default()).unwrap();
    assert_eq!(
        session.list_sheets(),
        vec![
            SheetListing {
                name: "August".to_string(),
                rows: 2,
                columns: 2,
                active: false,
            },
            SheetListing {
                name: "Consolidated".to_string(),
                rows: 3,
                columns: 2,
                active: true,
            },
        ]
    );
}

#[test]
fn switch_to_unknown_sheet_keeps_current() {
    let mut session = Session::new(workbook(), SessionOptions::default()).unwrap();
    let error = session.switch_sheet("September").unwrap_err();
    assert!(error.to_string().contains("August, Consolidated"));
    assert_eq!(session.active_sheet(), "Consolidated");

    assert_eq!(session.switch_sheet("August").unwrap(), (2, 2));
    assert_eq!(session.active_sheet(), "August");
}

#[test]
fn reformat_updates_only_the_active_sheet() {
    let mut session = Session::new(workbook(), SessionOptions::default()).unwrap();
    let executed = session.execute("reformat insurance column").unwrap();
    assert!(matches!(executed.outcome, Outcome::InsuranceReformatted(_)));
    assert!(executed.exported.is_none());

    let active = session.workbook().sheet("Consolidated").unwrap();
    assert_eq!(
        column_optional_strings(active.data.column("Insurance New").unwrap()),
        vec![
            Some("DD California".to_string()),
            None,
            Some("BCBS Texas".to_string()),
        ]
    );
    let other = session.workbook().sheet("August").unwrap();
    assert!(other.data.column("Insurance New").is_err());
}

#[test]
fn read_only_instructions_leave_sheet_alone() {
    let mut session = Session::new(workbook(), SessionOptions::default()).unwrap();
    session.execute("count insurance").unwrap();
    session.execute("show last 1 rows").unwrap();
    let (_, columns) = session.workbook().sheet("Consolidated").unwrap().shape();
    assert_eq!(columns, 2);
}

#[test]
fn history_records_every_instruction() {
    let mut session = Session::new(workbook(), SessionOptions::default()).unwrap();
    session.execute("  show first 2 rows ").unwrap();
    session.switch_sheet("August").unwrap();
    session.execute("count providers").unwrap_err();

    let history: Vec<(&str, &str)> = session
        .history()
        .iter()
        .map(|entry| (entry.instruction.as_str(), entry.sheet.as_str()))
        .collect();
    assert_eq!(
        history,
        vec![
            ("show first 2 rows", "Consolidated"),
            ("count providers", "August"),
        ]
    );
}

#[test]
fn failed_instruction_reports_missing_column() {
    let mut session = Session::new(workbook(), SessionOptions::default()).unwrap();
    let error = session.execute("count providers").unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("Provider Name"), "{message}");
}

#[test]
fn default_export_name_uses_source_stem() {
    let workbook = workbook().with_source(std::path::Path::new("/data/appointments.xlsx"));
    let session = Session::new(workbook, SessionOptions::default()).unwrap();
    let name = session.default_export_path();
    let name = name.to_str().unwrap();
    assert!(name.starts_with("processed_appointments_"), "{name}");
    assert!(name.ends_with(".xlsx"));
    // processed_appointments_YYYYmmdd_HHMMSS.xlsx
    assert_eq!(name.len(), "processed_appointments_".len() + 15 + ".xlsx".len());
}

#[test]
fn export_writes_every_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");

    let mut session = Session::new(workbook(), SessionOptions::default()).unwrap();
    session.execute("reformat insurance column").unwrap();
    let written = session.export(Some(path.as_path())).unwrap();
    assert_eq!(written, path);

    let reloaded = load_workbook(&path).unwrap();
    assert_eq!(reloaded.sheet_names(), vec!["August", "Consolidated"]);
    let consolidated = reloaded.sheet("Consolidated").unwrap();
    assert_eq!(
        column_optional_strings(consolidated.data.column("Insurance New").unwrap())[2].as_deref(),
        Some("BCBS Texas")
    );
}

#[test]
fn csv_export_writes_active_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("august.csv");

    let mut session = Session::new(workbook(), SessionOptions::default()).unwrap();
    session.switch_sheet("August").unwrap();
    session.normalize_column("Insurance", "Payer").unwrap();
    session.export(Some(path.as_path())).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "Office Name,Insurance,Payer\nNorth,Aetna,Aetna\nNorth,Humana Primary,Humana\n"
    );
}
