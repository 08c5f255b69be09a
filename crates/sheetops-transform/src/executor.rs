//! Instruction execution against the active sheet.
//!
//! Each [`Instruction`] variant maps to one handler. Handlers that change the
//! sheet look up their source column before writing, so a failed instruction
//! leaves the frame as it was.

use polars::prelude::DataFrame;
use sheetops_model::{
    CountTarget, FilterTarget, Instruction, PreviewEnd, SUGGESTED_INSTRUCTIONS, SessionOptions,
};

use crate::error::Result;
use crate::frame::column_names;
use crate::insurance::{ColumnNormalizationSummary, copy_column, normalize_insurance_column};
use crate::reports::{
    DatasetInfo, DateRange, SummaryReport, ValueCount, date_range, describe, filter_equals,
    summary, value_counts,
};

/// Value stored in the insurance column for patients without coverage.
pub const NO_INSURANCE: &str = "No Insurance";

/// Result of reformatting the insurance column.
#[derive(Debug, Clone)]
pub struct ReformatReport {
    pub summary: ColumnNormalizationSummary,
    /// Leading rows of the source and target columns side by side.
    pub sample: DataFrame,
    /// Most common values of the target column.
    pub top_values: Vec<ValueCount>,
}

/// What an instruction produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    Preview {
        end: PreviewEnd,
        rows: DataFrame,
    },
    Describe(DatasetInfo),
    Columns(Vec<String>),
    ColumnCopied {
        source: String,
        target: String,
        non_null: usize,
    },
    InsuranceReformatted(ReformatReport),
    ValueCounts {
        column: String,
        counts: Vec<ValueCount>,
    },
    RecordCount(usize),
    Filtered {
        description: String,
        rows: DataFrame,
    },
    DateRange(DateRange),
    Summary(SummaryReport),
    /// The caller owns the workbook and performs the write.
    ExportRequested,
    Help {
        instruction: String,
        suggestions: &'static [(&'static str, &'static str)],
    },
}

impl Outcome {
    /// Whether the active sheet was changed.
    pub fn modified_sheet(&self) -> bool {
        matches!(
            self,
            Self::ColumnCopied { .. } | Self::InsuranceReformatted(_)
        )
    }
}

/// Run one instruction against `df`.
pub fn execute(
    df: &mut DataFrame,
    instruction: &Instruction,
    options: &SessionOptions,
) -> Result<Outcome> {
    tracing::debug!(%instruction, rows = df.height(), "executing instruction");
    let columns = &options.columns;

    match instruction {
        Instruction::Preview { end, rows } => {
            let frame = match end {
                PreviewEnd::Head => df.head(Some(*rows)),
                PreviewEnd::Tail => df.tail(Some(*rows)),
            };
            Ok(Outcome::Preview {
                end: *end,
                rows: frame,
            })
        }
        Instruction::Describe => Ok(Outcome::Describe(describe(df))),
        Instruction::ListColumns | Instruction::Filter(FilterTarget::Columns) => {
            Ok(Outcome::Columns(column_names(df)))
        }
        Instruction::CopyInsuranceColumn => {
            let source = columns.insurance.clone();
            let target = options.derived_column_name(&source);
            let non_null = copy_column(df, &source, &target)?;
            Ok(Outcome::ColumnCopied {
                source,
                target,
                non_null,
            })
        }
        Instruction::ReformatInsurance => reformat_insurance(df, options),
        Instruction::Count(target) => {
            let column = match target {
                CountTarget::Records => return Ok(Outcome::RecordCount(df.height())),
                CountTarget::Insurance => &columns.insurance,
                CountTarget::Office => &columns.office,
                CountTarget::Provider => &columns.provider,
            };
            Ok(Outcome::ValueCounts {
                column: column.clone(),
                counts: value_counts(df, column, None)?,
            })
        }
        Instruction::Filter(FilterTarget::NoInsurance) => Ok(Outcome::Filtered {
            description: format!("{} = {NO_INSURANCE}", columns.insurance),
            rows: filter_equals(df, &columns.insurance, NO_INSURANCE)?,
        }),
        Instruction::Filter(FilterTarget::Insurance) => Ok(Outcome::ValueCounts {
            column: columns.insurance.clone(),
            counts: value_counts(df, &columns.insurance, Some(options.filter_top_values))?,
        }),
        Instruction::Filter(FilterTarget::Office) => Ok(Outcome::ValueCounts {
            column: columns.office.clone(),
            counts: value_counts(df, &columns.office, Some(options.filter_top_values))?,
        }),
        Instruction::Filter(FilterTarget::DateRange) => Ok(Outcome::DateRange(date_range(
            df,
            &columns.appointment_date,
        )?)),
        Instruction::Summary => Ok(Outcome::Summary(summary(
            df,
            columns,
            options.summary_top_values,
        )?)),
        Instruction::Export => Ok(Outcome::ExportRequested),
        Instruction::Unrecognized(text) => Ok(Outcome::Help {
            instruction: text.clone(),
            suggestions: SUGGESTED_INSTRUCTIONS,
        }),
    }
}

/// Canonicalize the insurance column into its derived column.
fn reformat_insurance(df: &mut DataFrame, options: &SessionOptions) -> Result<Outcome> {
    let source = options.columns.insurance.as_str();
    let target = options.derived_column_name(source);

    let summary = normalize_insurance_column(df, source, &target)?;
    let sample = df
        .select([source, target.as_str()])?
        .head(Some(options.sample_rows));
    let top_values = value_counts(df, &target, Some(options.reformat_top_values))?;

    Ok(Outcome::InsuranceReformatted(ReformatReport {
        summary,
        sample,
        top_values,
    }))
}
