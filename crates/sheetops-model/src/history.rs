//! Conversation history kept by an interactive session.

use chrono::{DateTime, Local};

/// One instruction issued during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub instruction: String,
    /// Sheet that was active when the instruction ran.
    pub sheet: String,
}

impl HistoryEntry {
    pub fn now(instruction: impl Into<String>, sheet: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            instruction: instruction.into(),
            sheet: sheet.into(),
        }
    }
}
