//! Interactive session state: the loaded workbook, the active sheet and the
//! instruction history.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use sheetops_ingest::{Workbook, write_csv, write_workbook};
use sheetops_model::{HistoryEntry, Instruction, SessionOptions};
use sheetops_transform::{ColumnNormalizationSummary, Outcome, execute, normalize_insurance_column};
use tracing::{info, info_span, warn};

use crate::logging::redact_value;

/// One row of the sheet listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetListing {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub active: bool,
}

/// Result of running one instruction in a session.
#[derive(Debug, Clone)]
pub struct Executed {
    pub instruction: Instruction,
    pub outcome: Outcome,
    /// Where the workbook was written, for export instructions.
    pub exported: Option<PathBuf>,
}

/// A workbook being worked on, one sheet at a time.
#[derive(Debug)]
pub struct Session {
    workbook: Workbook,
    active: String,
    options: SessionOptions,
    history: Vec<HistoryEntry>,
}

impl Session {
    /// Start a session on the preferred sheet, or the first sheet when the
    /// workbook has no sheet of that name.
    pub fn new(workbook: Workbook, options: SessionOptions) -> Result<Self> {
        let active = if workbook.contains(&options.preferred_sheet) {
            options.preferred_sheet.clone()
        } else {
            match workbook.first() {
                Some(sheet) => sheet.name.clone(),
                None => bail!("workbook has no sheets"),
            }
        };
        info!(sheet = %active, sheets = workbook.len(), "session started");
        Ok(Self {
            workbook,
            active,
            options,
            history: Vec::new(),
        })
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn active_sheet(&self) -> &str {
        &self.active
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Sheets in workbook order with their shapes.
    pub fn list_sheets(&self) -> Vec<SheetListing> {
        self.workbook
            .sheets()
            .iter()
            .map(|sheet| {
                let (rows, columns) = sheet.shape();
                SheetListing {
                    name: sheet.name.clone(),
                    rows,
                    columns,
                    active: sheet.name == self.active,
                }
            })
            .collect()
    }

    /// Make `name` the active sheet and return its shape.
    pub fn switch_sheet(&mut self, name: &str) -> Result<(usize, usize)> {
        let Ok(sheet) = self.workbook.sheet(name) else {
            bail!(
                "sheet '{name}' not found; available sheets: {}",
                self.workbook.sheet_names().join(", ")
            );
        };
        let shape = sheet.shape();
        self.active = sheet.name.clone();
        info!(sheet = %self.active, rows = shape.0, columns = shape.1, "switched sheet");
        Ok(shape)
    }

    /// Parse and run an instruction against the active sheet.
    ///
    /// Every instruction is recorded in the history, including ones that fail.
    /// The sheet is updated only when the instruction succeeds. An export
    /// instruction writes the workbook to its default path.
    pub fn execute(&mut self, text: &str) -> Result<Executed> {
        let span = info_span!("instruction", sheet = %self.active);
        let _guard = span.enter();

        self.history
            .push(HistoryEntry::now(text.trim(), self.active.clone()));
        let instruction = Instruction::parse(text, self.options.default_preview_rows);
        tracing::debug!(%instruction, text = redact_value(text), "parsed instruction");

        let sheet = self.workbook.sheet(&self.active)?;
        let mut data = sheet.data.clone();
        let outcome = match execute(&mut data, &instruction, &self.options) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%instruction, %error, "instruction failed");
                return Err(error).with_context(|| format!("could not {instruction}"));
            }
        };

        if outcome.modified_sheet() {
            self.workbook.sheet_mut(&self.active)?.data = data;
        }
        let exported = if matches!(outcome, Outcome::ExportRequested) {
            Some(self.export(None)?)
        } else {
            None
        };
        Ok(Executed {
            instruction,
            outcome,
            exported,
        })
    }

    /// Canonicalize `source` into `target` on the active sheet.
    pub fn normalize_column(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<ColumnNormalizationSummary> {
        let sheet = self.workbook.sheet_mut(&self.active)?;
        let mut data = sheet.data.clone();
        let summary = normalize_insurance_column(&mut data, source, target)
            .with_context(|| format!("failed to normalize column '{source}' of '{}'", sheet.name))?;
        sheet.data = data;
        Ok(summary)
    }

    /// Default export file name: `processed_<stem>_<YYYYmmdd_HHMMSS>.xlsx`.
    pub fn default_export_path(&self) -> PathBuf {
        let stem = self
            .workbook
            .source
            .as_deref()
            .and_then(Path::file_stem)
            .map_or_else(|| "data".to_string(), |s| s.to_string_lossy().into_owned());
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("processed_{stem}_{timestamp}.xlsx"))
    }

    /// Write the workbook and return the path written.
    ///
    /// `.xlsx` receives every sheet. `.csv` receives the active sheet only.
    pub fn export(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.map_or_else(|| self.default_export_path(), Path::to_path_buf);
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let written = if is_csv {
            let sheet = self.workbook.sheet(&self.active)?;
            write_csv(&sheet.data, &path)
        } else {
            write_workbook(&self.workbook, &path)
        };
        written.with_context(|| format!("failed to export {}", path.display()))?;
        info!(path = %path.display(), sheet = %self.active, "exported workbook");
        Ok(path)
    }
}
