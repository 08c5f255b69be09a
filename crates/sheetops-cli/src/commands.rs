use std::io::{self, BufRead};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use sheetops_cli::logging::redact_value;
use sheetops_cli::render::{apply_table_style, render_executed, render_normalized};
use sheetops_cli::repl::run_repl;
use sheetops_cli::session::Session;
use sheetops_ingest::load_workbook;
use sheetops_model::SessionOptions;
use sheetops_normalization::classify;
use tracing::{info, info_span, trace};

use crate::cli::{NormalizeArgs, ReformatArgs, RunArgs, SessionArgs, WorkbookArgs};

/// Load session options from `--config`, or the defaults.
pub fn load_options(config: Option<&Path>) -> Result<SessionOptions> {
    match config {
        Some(path) => SessionOptions::from_json_file(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(SessionOptions::default()),
    }
}

fn open_session(args: &SessionArgs, options: SessionOptions) -> Result<Session> {
    let path = &args.input.workbook;
    let workbook =
        load_workbook(path).with_context(|| format!("load workbook {}", path.display()))?;
    let mut session = Session::new(workbook, options)?;
    if let Some(sheet) = &args.sheet {
        session.switch_sheet(sheet)?;
    }
    Ok(session)
}

pub fn run_interactive(args: &SessionArgs, options: SessionOptions) -> Result<()> {
    let mut session = open_session(args, options)?;
    let span = info_span!("session", workbook = %args.input.workbook.display());
    let _guard = span.enter();

    println!("Loaded {}", args.input.workbook.display());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_repl(&mut session, stdin.lock(), &mut stdout).context("interactive session")
}

pub fn run_instructions(args: &RunArgs, options: SessionOptions) -> Result<()> {
    let mut session = open_session(&args.session, options)?;
    let span = info_span!("session", workbook = %args.session.input.workbook.display());
    let _guard = span.enter();

    for text in &args.instructions {
        let executed = session.execute(text)?;
        println!("[{}] {}", session.active_sheet(), executed.instruction);
        println!("{}", render_executed(&executed));
    }
    if let Some(path) = &args.export {
        let written = session.export(Some(path.as_path()))?;
        println!("Workbook exported to {}", written.display());
    }
    Ok(())
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let labels = if args.labels.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("read labels from stdin")?
    } else {
        args.labels.clone()
    };

    let rows: Vec<_> = labels
        .into_iter()
        .map(|raw| {
            let payer = classify(&raw);
            let category = payer.category();
            let canonical = payer.into_canonical();
            trace!(
                raw = redact_value(&raw),
                canonical = redact_value(&canonical),
                category = category.as_str(),
                "normalized label"
            );
            (raw, canonical, category)
        })
        .collect();
    info!(labels = rows.len(), "normalized labels");
    println!("{}", render_normalized(&rows));
    Ok(())
}

pub fn run_reformat(args: &ReformatArgs, options: SessionOptions) -> Result<()> {
    let source = args
        .column
        .clone()
        .unwrap_or_else(|| options.columns.insurance.clone());
    let target = args
        .target
        .clone()
        .unwrap_or_else(|| options.derived_column_name(&source));

    let mut session = open_session(&args.session, options)?;
    let summary = session.normalize_column(&source, &target)?;
    let written = session.export(Some(args.output.as_path()))?;
    println!(
        "Reformatted '{source}' into '{target}' on sheet '{}': {} of {} rows, {} distinct names",
        session.active_sheet(),
        summary.non_null,
        summary.rows,
        summary.distinct_outputs
    );
    println!("Workbook exported to {}", written.display());
    Ok(())
}

pub fn run_sheets(args: &WorkbookArgs) -> Result<()> {
    let path = &args.workbook;
    let workbook =
        load_workbook(path).with_context(|| format!("load workbook {}", path.display()))?;
    let mut table = Table::new();
    table.set_header(vec!["#", "Sheet", "Rows", "Columns"]);
    apply_table_style(&mut table);
    for (idx, sheet) in workbook.sheets().iter().enumerate() {
        let (rows, columns) = sheet.shape();
        table.add_row(vec![
            (idx + 1).to_string(),
            sheet.name.clone(),
            rows.to_string(),
            columns.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
