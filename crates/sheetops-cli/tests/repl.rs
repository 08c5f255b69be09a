//! The interactive loop driven from in-memory input.

use std::io::Cursor;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use sheetops_cli::repl::run_repl;
use sheetops_cli::session::Session;
use sheetops_ingest::{Sheet, Workbook};
use sheetops_model::SessionOptions;

fn session() -> Session {
    let data = DataFrame::new(vec![
        Series::new("Insurance".into(), &["cigna secondary", "NO INSURANCE", "Aetna"])
            .into_column(),
    ])
    .unwrap();
    let workbook = Workbook::new()
        .with_sheet(Sheet::new("Consolidated", data.clone()))
        .with_sheet(Sheet::new("July", data));
    Session::new(workbook, SessionOptions::default()).unwrap()
}

fn drive(session: &mut Session, input: &str) -> String {
    let mut output = Vec::new();
    run_repl(session, Cursor::new(input), &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn quit_ends_the_loop() {
    let mut session = session();
    let output = drive(&mut session, "quit\nshow first 2 rows\n");
    assert!(output.ends_with("Goodbye!\n"));
    assert!(session.history().is_empty());
}

#[test]
fn end_of_input_ends_the_loop() {
    let mut session = session();
    let output = drive(&mut session, "count records\n");
    assert!(output.contains("Total records: 3"));
    assert!(output.ends_with("Goodbye!\n"));
}

#[test]
fn switch_changes_prompt() {
    let mut session = session();
    let output = drive(&mut session, "switch July\nq\n");
    assert!(output.contains("Switched to sheet: July (3 rows × 1 columns)"));
    assert!(output.contains("[July] > "));
    assert_eq!(session.active_sheet(), "July");
}

#[test]
fn errors_do_not_end_the_loop() {
    let mut session = session();
    let output = drive(&mut session, "switch Nowhere\ncount offices\nlist\nq\n");
    assert!(output.contains("sheet 'Nowhere' not found"));
    assert!(output.contains("Try rephrasing"));
    assert!(output.contains("1. Consolidated: 3 rows × 1 columns (current)"));
    assert!(output.contains("2. July: 3 rows × 1 columns"));
}

#[test]
fn unrecognized_instruction_shows_suggestions() {
    let mut session = session();
    let output = drive(&mut session, "make it nice\nq\n");
    assert!(output.contains("Instruction not recognized: make it nice"));
    assert!(output.contains("reformat insurance column"));
}

#[test]
fn reformat_then_history() {
    let mut session = session();
    let output = drive(&mut session, "reformat insurance column\nhistory\nq\n");
    assert!(output.contains("Reformatted 'Insurance' into 'Insurance New': 3 of 3 rows"));
    assert!(output.contains("No Insurance"));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].instruction, "reformat insurance column");
}

#[test]
fn export_command_writes_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clean.xlsx");
    let mut session = session();
    let output = drive(&mut session, &format!("export {}\nq\n", path.display()));
    assert!(output.contains("Workbook exported to"));
    assert!(path.exists());
}
