//! Workbook ingestion and export for sheetops.
//!
//! A [`Workbook`] is an ordered list of named Polars DataFrames. Loading
//! dispatches on the file extension; see [`reader`] and [`writer`].

pub mod error;
pub mod reader;
pub mod workbook;
pub mod writer;

pub use error::{IngestError, Result};
pub use reader::{
    SPREADSHEET_EXTENSIONS, frame_from_rows, load_workbook, read_csv_workbook, read_spreadsheet,
};
pub use workbook::{Sheet, Workbook};
pub use writer::{MAX_SHEET_NAME_LEN, write_csv, write_workbook, write_xlsx, xlsx_sheet_names};
