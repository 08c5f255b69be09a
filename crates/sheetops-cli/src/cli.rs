//! CLI argument definitions for sheetops.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sheetops",
    version,
    about = "Spreadsheet automation with insurance payer-name normalization",
    long_about = "Run plain-language instructions against workbook sheets.\n\n\
                  Instructions map to a fixed set of operations: previews, counts,\n\
                  filters, summaries, and canonicalizing insurance payer names."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values (payer names, instruction text) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Session options as JSON (column names, preview rows, report sizes).
    #[arg(long = "config", value_name = "JSON", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a workbook and type instructions interactively.
    Repl(SessionArgs),

    /// Run instructions against a workbook and print the results.
    Run(RunArgs),

    /// Canonicalize insurance payer labels (reads stdin lines when none given).
    Normalize(NormalizeArgs),

    /// Canonicalize the insurance column of a sheet and write the workbook.
    Reformat(ReformatArgs),

    /// List the sheets of a workbook.
    Sheets(WorkbookArgs),
}

#[derive(Parser)]
pub struct WorkbookArgs {
    /// Workbook to open (.xlsx, .xlsm, .xls, .xlsb, .ods or .csv).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,
}

#[derive(Parser)]
pub struct SessionArgs {
    #[command(flatten)]
    pub input: WorkbookArgs,

    /// Sheet to start on (default: the preferred sheet, else the first).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,
}

#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Instructions, run in order against the same sheet.
    #[arg(value_name = "INSTRUCTION", required = true)]
    pub instructions: Vec<String>,

    /// Write the workbook here after the instructions have run.
    #[arg(long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Payer labels to canonicalize.
    #[arg(value_name = "LABEL")]
    pub labels: Vec<String>,
}

#[derive(Parser)]
pub struct ReformatArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Column holding the payer names (default from config: Insurance).
    #[arg(long = "column", value_name = "NAME")]
    pub column: Option<String>,

    /// Column to write (default: the source column name plus " New").
    #[arg(long = "target", value_name = "NAME")]
    pub target: Option<String>,

    /// Output workbook (.xlsx writes every sheet, .csv the reformatted sheet).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
