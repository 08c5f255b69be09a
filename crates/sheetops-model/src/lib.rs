pub mod error;
pub mod history;
pub mod instruction;
pub mod options;

pub use error::{ModelError, Result};
pub use history::HistoryEntry;
pub use instruction::{
    CountTarget, FilterTarget, Instruction, PreviewEnd, SUGGESTED_INSTRUCTIONS,
};
pub use options::{ColumnNames, SessionOptions};
