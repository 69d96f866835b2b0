use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::registry::Registry;
use crate::runtime::Runtime;
use crate::session::Session;

use super::config::Config;
use super::export::export;

const PROMPT: &str = "pydeps> ";

const BANNER: &str = "# Type 'add <package>' to start, or 'help' for all commands.\n\
                      # Dependencies will appear here, grouped by package.";

const HELP: &str = "Commands:
  add <package>      Add a package and refresh the report
  remove <package>   Remove a package (alias: rm)
  list               Show selected packages (alias: ls)
  report             Fetch the report again for the current packages
  save <path>        Write the current report to a file
  help               Show this help
  quit               Leave the shell (alias: exit)";

/// A parsed shell input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Remove(String),
    List,
    Report,
    Save(String),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    /// Splits `line` into a command word and its argument. The argument is
    /// only trimmed, so package validation sees what was typed.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => ShellCommand::Empty,
            "add" => ShellCommand::Add(rest.to_string()),
            "remove" | "rm" => ShellCommand::Remove(rest.to_string()),
            "list" | "ls" => ShellCommand::List,
            "report" | "refresh" => ShellCommand::Report,
            "save" => ShellCommand::Save(rest.to_string()),
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => ShellCommand::Unknown(word.to_string()),
        }
    }
}

fn render_view<G: Registry, W: Write>(session: &Session<G>, output: &mut W) -> Result<()> {
    let view = session.view();
    match view.error {
        Some(error) => writeln!(output, "error: {}", error)?,
        None => writeln!(output, "{}\n", view.report)?,
    }
    Ok(())
}

/// Interactive session reading commands from `input` until `quit` or EOF.
///
/// Every successful add or remove recomputes and prints the report.
/// Rejected input prints the validation message and leaves the report as is.
pub async fn shell<R: Runtime, G: Registry, I: BufRead, W: Write>(
    config: Config<R, G>,
    input: &mut I,
    output: &mut W,
) -> Result<()> {
    let Config { runtime, registry } = config;
    let session = Session::new(registry);

    writeln!(output, "{}\n", BANNER)?;

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            debug!("End of input, leaving shell");
            writeln!(output)?;
            break;
        }

        match ShellCommand::parse(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Add(raw) => {
                let _ = session.add(&raw).await;
                render_view(&session, output)?;
            }
            ShellCommand::Remove(raw) => {
                if !session.remove(&raw).await {
                    debug!("'{}' was not selected", raw);
                }
                render_view(&session, output)?;
            }
            ShellCommand::List => {
                let packages = session.packages();
                if packages.is_empty() {
                    writeln!(output, "No packages selected.")?;
                }
                for name in packages {
                    writeln!(output, "{}", name)?;
                }
            }
            ShellCommand::Report => {
                session.refresh().await;
                render_view(&session, output)?;
            }
            ShellCommand::Save(path) if path.is_empty() => {
                writeln!(output, "error: Usage: save <path>")?;
            }
            ShellCommand::Save(path) => {
                match export(&runtime, Path::new(&path), &session.report()) {
                    Ok(()) => writeln!(output, "Saved report to {}", path)?,
                    Err(e) => writeln!(output, "error: {:#}", e)?,
                }
            }
            ShellCommand::Help => writeln!(output, "{}", HELP)?,
            ShellCommand::Quit => break,
            ShellCommand::Unknown(word) => {
                writeln!(
                    output,
                    "error: Unknown command '{}'. Type 'help' for a list of commands.",
                    word
                )?;
            }
        }
    }

    Ok(())
}
