//! Interactive read-eval-print loop over a session.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::render::{render_executed, render_history, render_sheet_list};
use crate::session::Session;

/// A line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Quit,
    List,
    History,
    Switch(&'a str),
    /// `export` alone, or followed by an `.xlsx`/`.csv` path.
    Export(Option<&'a Path>),
    Instruction(&'a str),
    Empty,
}

impl<'a> ReplCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let lower = line.to_lowercase();
        match lower.as_str() {
            "" => return Self::Empty,
            "quit" | "exit" | "q" => return Self::Quit,
            "list" => return Self::List,
            "history" => return Self::History,
            "export" => return Self::Export(None),
            _ => {}
        }
        if lower.starts_with("switch ") {
            return Self::Switch(line.get("switch ".len()..).unwrap_or_default().trim());
        }
        if lower.starts_with("export ") {
            let path = Path::new(line.get("export ".len()..).unwrap_or_default().trim());
            let is_workbook = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("csv")
                });
            if is_workbook {
                return Self::Export(Some(path));
            }
        }
        Self::Instruction(line)
    }
}

const BANNER: &str = "\
Commands:
  <instruction>     e.g. 'show first 10 rows', 'reformat insurance column'
  switch <sheet>    change the active sheet
  list              list sheets
  history           instructions run so far
  export [PATH]     write the workbook (.xlsx or .csv)
  quit              leave";

/// Run the loop until `quit` or end of input.
///
/// Failed instructions and commands are reported and the loop continues.
pub fn run_repl<R, W>(session: &mut Session, input: R, output: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{BANNER}")?;
    let mut lines = input.lines();
    loop {
        write!(output, "\n[{}] > ", session.active_sheet())?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;

        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Empty => writeln!(output, "Enter an instruction or command.")?,
            ReplCommand::List => writeln!(output, "{}", render_sheet_list(&session.list_sheets()))?,
            ReplCommand::History => writeln!(output, "{}", render_history(session.history()))?,
            ReplCommand::Switch(name) => match session.switch_sheet(name) {
                Ok((rows, columns)) => writeln!(
                    output,
                    "Switched to sheet: {name} ({rows} rows × {columns} columns)"
                )?,
                Err(error) => writeln!(output, "error: {error:#}")?,
            },
            ReplCommand::Export(path) => match session.export(path) {
                Ok(path) => writeln!(output, "Workbook exported to {}", path.display())?,
                Err(error) => writeln!(output, "error: {error:#}")?,
            },
            ReplCommand::Instruction(text) => match session.execute(text) {
                Ok(executed) => writeln!(output, "{}", render_executed(&executed))?,
                Err(error) => {
                    writeln!(output, "error: {error:#}")?;
                    writeln!(output, "Try rephrasing the instruction, or type a suggested one.")?;
                }
            },
        }
    }
    writeln!(output, "Goodbye!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loop_commands() {
        assert_eq!(ReplCommand::parse("  Q "), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("EXIT"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("list"), ReplCommand::List);
        assert_eq!(ReplCommand::parse("Switch  August "), ReplCommand::Switch("August"));
        assert_eq!(ReplCommand::parse(""), ReplCommand::Empty);
    }

    #[test]
    fn export_takes_an_optional_workbook_path() {
        assert_eq!(ReplCommand::parse("export"), ReplCommand::Export(None));
        assert_eq!(
            ReplCommand::parse("export out/clean.xlsx"),
            ReplCommand::Export(Some(Path::new("out/clean.xlsx")))
        );
        assert_eq!(
            ReplCommand::parse("export the data"),
            ReplCommand::Instruction("export the data")
        );
    }

    #[test]
    fn everything_else_is_an_instruction() {
        assert_eq!(
            ReplCommand::parse("show first 5 rows"),
            ReplCommand::Instruction("show first 5 rows")
        );
        assert_eq!(ReplCommand::parse("listing"), ReplCommand::Instruction("listing"));
    }
}
