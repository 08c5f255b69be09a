//! Free-text instruction dispatch.
//!
//! Instructions are matched by keyword into a closed set of canned operations.
//! There is no language understanding here: the first keyword family that
//! appears in the lowercased text decides the operation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid number regex"));

/// Which end of the sheet a preview reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewEnd {
    Head,
    Tail,
}

/// Column targeted by a `count` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountTarget {
    Insurance,
    Office,
    Provider,
    /// No column named: count rows.
    Records,
}

/// Report produced by a `filter` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterTarget {
    /// Rows whose insurance is exactly `No Insurance`.
    NoInsurance,
    /// Most common insurance values.
    Insurance,
    /// Earliest and latest appointment date.
    DateRange,
    /// Most common office names.
    Office,
    /// Nothing recognizable to filter on: list the columns.
    Columns,
}

/// A canned operation against the active sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Preview { end: PreviewEnd, rows: usize },
    Describe,
    ListColumns,
    CopyInsuranceColumn,
    ReformatInsurance,
    Count(CountTarget),
    Filter(FilterTarget),
    Summary,
    Export,
    Unrecognized(String),
}

impl Instruction {
    /// Map free text to an instruction.
    ///
    /// `default_rows` is used by previews when the text carries no number.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetops_model::{Instruction, PreviewEnd};
    ///
    /// assert_eq!(
    ///     Instruction::parse("show first 5 rows", 10),
    ///     Instruction::Preview { end: PreviewEnd::Head, rows: 5 }
    /// );
    /// assert_eq!(
    ///     Instruction::parse("reformat insurance column", 10),
    ///     Instruction::ReformatInsurance
    /// );
    /// ```
    pub fn parse(text: &str, default_rows: usize) -> Self {
        let instruction = text.trim().to_lowercase();
        let has = |keyword: &str| instruction.contains(keyword);

        if has("show") || has("display") {
            // "first" wins over "last" when both appear
            let end = if !has("first") && has("last") {
                PreviewEnd::Tail
            } else {
                PreviewEnd::Head
            };
            let rows = extract_number(&instruction).unwrap_or(default_rows);
            return Self::Preview { end, rows };
        }

        if has("info") || has("describe") {
            return Self::Describe;
        }

        if has("copy") && (has("column") || has("insurance")) {
            if has("insurance") && has("insurance new") {
                return Self::CopyInsuranceColumn;
            }
            return Self::ListColumns;
        }

        if has("reformat") && has("insurance") {
            return Self::ReformatInsurance;
        }

        if has("count") {
            let target = if has("insurance") {
                CountTarget::Insurance
            } else if has("office") {
                CountTarget::Office
            } else if has("provider") {
                CountTarget::Provider
            } else {
                CountTarget::Records
            };
            return Self::Count(target);
        }

        if has("filter") {
            let target = if has("no insurance") {
                FilterTarget::NoInsurance
            } else if has("insurance") {
                FilterTarget::Insurance
            } else if has("date") {
                FilterTarget::DateRange
            } else if has("office") {
                FilterTarget::Office
            } else {
                FilterTarget::Columns
            };
            return Self::Filter(target);
        }

        if has("summary") || has("report") {
            return Self::Summary;
        }

        if has("export") || has("save") {
            return Self::Export;
        }

        Self::Unrecognized(text.trim().to_string())
    }

    /// Whether running this instruction may change the active sheet.
    pub fn mutates_sheet(&self) -> bool {
        matches!(self, Self::CopyInsuranceColumn | Self::ReformatInsurance)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preview {
                end: PreviewEnd::Head,
                rows,
            } => write!(f, "show first {rows} rows"),
            Self::Preview {
                end: PreviewEnd::Tail,
                rows,
            } => write!(f, "show last {rows} rows"),
            Self::Describe => f.write_str("describe data"),
            Self::ListColumns => f.write_str("list columns"),
            Self::CopyInsuranceColumn => f.write_str("copy insurance column"),
            Self::ReformatInsurance => f.write_str("reformat insurance column"),
            Self::Count(CountTarget::Insurance) => f.write_str("count insurance"),
            Self::Count(CountTarget::Office) => f.write_str("count offices"),
            Self::Count(CountTarget::Provider) => f.write_str("count providers"),
            Self::Count(CountTarget::Records) => f.write_str("count records"),
            Self::Filter(FilterTarget::NoInsurance) => f.write_str("filter no insurance"),
            Self::Filter(FilterTarget::Insurance) => f.write_str("filter insurance"),
            Self::Filter(FilterTarget::DateRange) => f.write_str("filter date"),
            Self::Filter(FilterTarget::Office) => f.write_str("filter office"),
            Self::Filter(FilterTarget::Columns) => f.write_str("filter"),
            Self::Summary => f.write_str("summary report"),
            Self::Export => f.write_str("export"),
            Self::Unrecognized(text) => write!(f, "unrecognized: {text}"),
        }
    }
}

/// Suggested instructions shown when an instruction is not recognized.
pub const SUGGESTED_INSTRUCTIONS: &[(&str, &str)] = &[
    ("reformat insurance column", "Clean up insurance names"),
    ("show first 10 rows", "Display sample data"),
    ("count insurance types", "Count unique insurance types"),
    ("copy Insurance to Insurance New", "Copy column data"),
    ("describe data", "Shape, columns, types and missing values"),
    ("filter no insurance", "Rows without insurance"),
    ("generate summary report", "Totals and top values"),
    ("export", "Write all sheets to a new workbook"),
];

/// First run of digits in `text`, if it fits in a `usize`.
fn extract_number(text: &str) -> Option<usize> {
    NUMBER_REGEX
        .find(text)
        .and_then(|m| m.as_str().parse::<usize>().ok())
}
