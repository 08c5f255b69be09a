//! Terminal rendering of instruction outcomes.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};
use sheetops_common::{any_to_optional_string, format_numeric};
use sheetops_model::{HistoryEntry, PreviewEnd};
use sheetops_normalization::MatchCategory;
use sheetops_transform::{
    DatasetInfo, DateRange, Outcome, ReformatReport, SummaryReport, ValueCount,
};

use crate::session::{Executed, SheetListing};

const MISSING: &str = "-";

/// Render the result of one instruction.
pub fn render_executed(executed: &Executed) -> String {
    match &executed.exported {
        Some(path) => format!("Workbook exported to {}", path.display()),
        None => render_outcome(&executed.outcome),
    }
}

/// Render an outcome as text with tables.
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Preview { end, rows } => {
            let label = match end {
                PreviewEnd::Head => "First",
                PreviewEnd::Tail => "Last",
            };
            format!("{label} {} rows:\n{}", rows.height(), frame_table(rows))
        }
        Outcome::Describe(info) => render_describe(info),
        Outcome::Columns(columns) => {
            let mut out = String::from("Available columns:");
            for (idx, name) in columns.iter().enumerate() {
                out.push_str(&format!("\n  {}. {name}", idx + 1));
            }
            out
        }
        Outcome::ColumnCopied {
            source,
            target,
            non_null,
        } => format!("Copied '{source}' to '{target}' ({non_null} non-empty values)"),
        Outcome::InsuranceReformatted(report) => render_reformat(report),
        Outcome::ValueCounts { column, counts } => format!(
            "{column}: {} distinct values\n{}",
            counts.len(),
            counts_table(column, counts)
        ),
        Outcome::RecordCount(count) => format!("Total records: {count}"),
        Outcome::Filtered { description, rows } => format!(
            "{} rows where {description}\n{}",
            rows.height(),
            frame_table(rows)
        ),
        Outcome::DateRange(range) => render_date_range(range),
        Outcome::Summary(report) => render_summary(report),
        Outcome::ExportRequested => "Export requested".to_string(),
        Outcome::Help {
            instruction,
            suggestions,
        } => {
            let mut table = Table::new();
            table.set_header(vec![header_cell("Try"), header_cell("To")]);
            apply_table_style(&mut table);
            for (example, description) in *suggestions {
                table.add_row(vec![Cell::new(example), Cell::new(description)]);
            }
            format!("Instruction not recognized: {instruction}\n{table}")
        }
    }
}

/// Numbered sheet listing, marking the active sheet.
pub fn render_sheet_list(sheets: &[SheetListing]) -> String {
    let mut out = String::from("Available sheets:");
    for (idx, sheet) in sheets.iter().enumerate() {
        let current = if sheet.active { " (current)" } else { "" };
        out.push_str(&format!(
            "\n  {}. {}: {} rows × {} columns{current}",
            idx + 1,
            sheet.name,
            sheet.rows,
            sheet.columns
        ));
    }
    out
}

pub fn render_history(history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return "No instructions yet".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Time"),
        header_cell("Sheet"),
        header_cell("Instruction"),
    ]);
    apply_table_style(&mut table);
    for (idx, entry) in history.iter().enumerate() {
        table.add_row(vec![
            dim_cell(idx + 1),
            Cell::new(entry.timestamp.format("%H:%M:%S")),
            Cell::new(&entry.sheet),
            Cell::new(&entry.instruction),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    table.to_string()
}

/// Table of raw labels and their canonical names.
pub fn render_normalized(rows: &[(String, String, MatchCategory)]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Canonical"),
        header_cell("Match"),
    ]);
    apply_table_style(&mut table);
    for (raw, canonical, category) in rows {
        table.add_row(vec![
            Cell::new(raw),
            Cell::new(canonical).add_attribute(Attribute::Bold),
            category_cell(*category),
        ]);
    }
    table.to_string()
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Rows of a frame as a table, nulls shown dimmed.
pub fn frame_table(df: &DataFrame) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .into_iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in 0..df.height() {
        let cells: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| {
                match any_to_optional_string(column.get(row).unwrap_or(AnyValue::Null)) {
                    Some(value) => Cell::new(value),
                    None => dim_cell(MISSING),
                }
            })
            .collect();
        table.add_row(cells);
    }
    table
}

fn render_describe(info: &DatasetInfo) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Non-null"),
        header_cell("Missing"),
        header_cell("Mean"),
        header_cell("Min"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    for column in &info.columns {
        let stat = |value: Option<f64>| match value {
            Some(value) => Cell::new(format_numeric(round(value))),
            None => dim_cell(MISSING),
        };
        let numeric = column.numeric.as_ref();
        table.add_row(vec![
            Cell::new(&column.name),
            dim_cell(&column.dtype),
            Cell::new(column.non_null),
            count_cell(column.nulls, Color::Yellow),
            stat(numeric.map(|s| s.mean)),
            stat(numeric.map(|s| s.min)),
            stat(numeric.map(|s| s.max)),
        ]);
    }
    for idx in 2..7 {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    format!(
        "Shape: {} rows × {} columns\n{table}",
        info.rows,
        info.columns.len()
    )
}

fn render_reformat(report: &ReformatReport) -> String {
    let summary = &report.summary;
    let mut categories = Table::new();
    categories.set_header(vec![header_cell("Match"), header_cell("Values")]);
    apply_table_style(&mut categories);
    for (category, count) in &summary.categories {
        categories.add_row(vec![category_cell(*category), Cell::new(count)]);
    }
    align_column(&mut categories, 1, CellAlignment::Right);

    format!(
        "Reformatted '{}' into '{}': {} of {} rows, {} distinct names\n{categories}\n\
         Before and after (first {} rows):\n{}\nTop values:\n{}",
        summary.source,
        summary.target,
        summary.non_null,
        summary.rows,
        summary.distinct_outputs,
        report.sample.height(),
        frame_table(&report.sample),
        counts_table(&summary.target, &report.top_values)
    )
}

fn render_date_range(range: &DateRange) -> String {
    format!(
        "{}: {} to {}",
        range.column,
        range.earliest.as_deref().unwrap_or(MISSING),
        range.latest.as_deref().unwrap_or(MISSING)
    )
}

fn render_summary(report: &SummaryReport) -> String {
    let mut lines = vec![format!("Total records: {}", report.records)];
    if let Some(range) = &report.date_range {
        lines.push(format!("Date range ({})", render_date_range(range)));
    }
    let uniques = [
        ("Unique offices", report.unique_offices),
        ("Unique providers", report.unique_providers),
        ("Unique patients", report.unique_patients),
    ];
    for (label, value) in uniques {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
    if let Some(counts) = &report.top_insurance {
        lines.push(format!("Top insurance:\n{}", counts_table("Insurance", counts)));
    }
    if let Some(counts) = &report.top_offices {
        lines.push(format!("Top offices:\n{}", counts_table("Office", counts)));
    }
    lines.join("\n")
}

fn counts_table(label: &str, counts: &[ValueCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(label), header_cell("Count")]);
    apply_table_style(&mut table);
    for entry in counts {
        table.add_row(vec![Cell::new(&entry.value), Cell::new(entry.count)]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

fn round(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn category_cell(category: MatchCategory) -> Cell {
    let color = match category {
        MatchCategory::Sentinel => Color::Yellow,
        MatchCategory::Family | MatchCategory::Fixed => Color::Green,
        MatchCategory::Passthrough => Color::DarkGrey,
    };
    Cell::new(category.as_str()).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_list_marks_current() {
        let sheets = vec![
            SheetListing {
                name: "August".to_string(),
                rows: 2,
                columns: 5,
                active: false,
            },
            SheetListing {
                name: "Consolidated".to_string(),
                rows: 120,
                columns: 5,
                active: true,
            },
        ];
        insta::assert_snapshot!(render_sheet_list(&sheets), @r"
        Available sheets:
          1. August: 2 rows × 5 columns
          2. Consolidated: 120 rows × 5 columns (current)
        ");
    }

    #[test]
    fn summary_omits_absent_sections() {
        let report = SummaryReport {
            records: 4,
            date_range: None,
            unique_offices: Some(2),
            unique_providers: None,
            unique_patients: None,
            top_insurance: None,
            top_offices: None,
        };
        insta::assert_snapshot!(render_summary(&report), @r"
        Total records: 4
        Unique offices: 2
        ");
    }

    #[test]
    fn date_range_shows_missing_ends() {
        let range = DateRange {
            column: "Appoinment Date".to_string(),
            earliest: None,
            latest: None,
        };
        assert_eq!(render_date_range(&range), "Appoinment Date: - to -");
    }
}
