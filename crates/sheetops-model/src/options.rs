//! Configuration options for a sheetops session.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Names of the workbook columns the canned reports look for.
///
/// Defaults match the appointment export the reports were written for,
/// including its `Appoinment Date` header spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub insurance: String,
    pub office: String,
    pub provider: String,
    pub patient: String,
    pub appointment_date: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            insurance: "Insurance".to_string(),
            office: "Office Name".to_string(),
            provider: "Provider Name".to_string(),
            patient: "Patient ID".to_string(),
            appointment_date: "Appoinment Date".to_string(),
        }
    }
}

/// Options controlling how instructions run against the active sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Sheet selected on load when present; otherwise the first sheet is used.
    pub preferred_sheet: String,

    /// Rows shown by "show first/last" when the instruction carries no number.
    pub default_preview_rows: usize,

    /// Suffix appended to a source column name to name its derived column.
    pub derived_column_suffix: String,

    /// Rows in the before/after sample printed after reformatting.
    pub sample_rows: usize,

    /// Distinct values listed after reformatting.
    pub reformat_top_values: usize,

    /// Distinct values listed by the filter reports.
    pub filter_top_values: usize,

    /// Distinct values listed per section of the summary report.
    pub summary_top_values: usize,

    pub columns: ColumnNames,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            preferred_sheet: "Consolidated".to_string(),
            default_preview_rows: 10,
            derived_column_suffix: " New".to_string(),
            sample_rows: 15,
            reformat_top_values: 25,
            filter_top_values: 10,
            summary_top_values: 5,
            columns: ColumnNames::default(),
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ModelError::OptionsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    #[must_use]
    pub fn with_preferred_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.preferred_sheet = sheet.into();
        self
    }

    #[must_use]
    pub fn with_insurance_column(mut self, column: impl Into<String>) -> Self {
        self.columns.insurance = column.into();
        self
    }

    #[must_use]
    pub fn with_default_preview_rows(mut self, rows: usize) -> Self {
        self.default_preview_rows = rows;
        self
    }

    /// Name of the column derived from `source` (e.g. `Insurance` -> `Insurance New`).
    pub fn derived_column_name(&self, source: &str) -> String {
        format!("{source}{}", self.derived_column_suffix)
    }
}
