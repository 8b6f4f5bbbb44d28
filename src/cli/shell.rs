//! Interactive prompt: one command per line until `exit` or end of input.

use std::io::{BufRead, Write};

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cli::{execute, Action, App, HISTORY_LIMIT};

const BANNER_WIDTH: usize = 80;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Run(Action),
    Help,
    Exit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("Please specify a topic to {0}.")]
    MissingTopic(&'static str),
    #[error("History limit must be a positive number, got '{0}'.")]
    InvalidLimit(String),
    #[error("Unknown command: {0}\nType 'help' for a list of commands.")]
    UnknownCommand(String),
}

/// Split a line into a case-insensitive command word and its argument text.
pub fn parse_line(input: &str) -> Result<Line, LineError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Line::Empty);
    }
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };
    let topic = |verb: &'static str| {
        if rest.is_empty() {
            Err(LineError::MissingTopic(verb))
        } else {
            Ok(rest.to_string())
        }
    };
    let action = match command.to_lowercase().as_str() {
        "exit" | "quit" => return Ok(Line::Exit),
        "help" => return Ok(Line::Help),
        "search" => Action::Search(topic("search for")?),
        "save" => Action::Save(topic("save")?),
        "remove" => Action::Remove(topic("remove")?),
        "list" => Action::List,
        "history" => Action::History {
            limit: parse_limit(rest)?,
        },
        "summary" => Action::Summary((!rest.is_empty()).then(|| rest.to_string())),
        "clear" => Action::Clear,
        other => return Err(LineError::UnknownCommand(other.to_string())),
    };
    Ok(Line::Run(action))
}

fn parse_limit(rest: &str) -> Result<usize, LineError> {
    if rest.is_empty() {
        return Ok(HISTORY_LIMIT);
    }
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(LineError::InvalidLimit(rest.to_string())),
    }
}

/// Read commands from `input` until `exit` or end of input. Command failures
/// are printed and the loop carries on.
pub async fn run<R: BufRead>(app: &mut App, mut input: R, out: &mut dyn Write) -> Result<()> {
    print_help(out)?;
    let mut buf = Vec::new();
    loop {
        write!(out, "\n> ")?;
        out.flush()?;
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(out, "\nGoodbye!")?;
            break;
        }
        // Undecodable bytes become U+FFFD rather than ending the session.
        let line = String::from_utf8_lossy(&buf);
        debug!(%line, "shell input");
        match parse_line(&line) {
            Ok(Line::Empty) => {}
            Ok(Line::Help) => print_help(out)?,
            Ok(Line::Exit) => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            Ok(Line::Run(action)) => {
                if let Err(err) = execute(app, action, out).await {
                    warn!(error = %format!("{err:#}"), "command failed");
                    writeln!(out, "Error: {err:#}")?;
                }
            }
            Err(err) => writeln!(out, "{err}")?,
        }
    }
    out.flush()?;
    Ok(())
}

pub fn print_help(out: &mut dyn Write) -> Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "{:^width$}", "NEWS DIGEST", width = BANNER_WIDTH)?;
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "\nRetrieve news articles on a topic and summarise them to your preference."
    )?;
    writeln!(out, "\nCommands:")?;
    writeln!(out, "  search <topic>   - Search for news on a topic")?;
    writeln!(out, "  save <topic>     - Save a topic of interest")?;
    writeln!(out, "  list             - List saved topics")?;
    writeln!(out, "  remove <topic>   - Remove a saved topic")?;
    writeln!(out, "  history [n]      - View recent searches, newest first")?;
    writeln!(out, "  summary [type]   - Show or set summary type (brief or detailed)")?;
    writeln!(out, "  clear            - Clear search history")?;
    writeln!(out, "  help             - Display this help message")?;
    writeln!(out, "  exit             - Exit the application")?;
    writeln!(out, "{rule}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_word_is_case_insensitive_and_topic_kept_verbatim() {
        assert_eq!(
            parse_line("SEARCH  Dental Care ").unwrap(),
            Line::Run(Action::Search("Dental Care".into()))
        );
        assert_eq!(parse_line("Exit").unwrap(), Line::Exit);
        assert_eq!(parse_line("   ").unwrap(), Line::Empty);
    }

    #[test]
    fn missing_arguments_are_reported() {
        assert_eq!(
            parse_line("save").unwrap_err(),
            LineError::MissingTopic("save")
        );
        assert_eq!(
            parse_line("search ").unwrap_err().to_string(),
            "Please specify a topic to search for."
        );
    }

    #[test]
    fn history_limit_defaults_and_validates() {
        assert_eq!(
            parse_line("history").unwrap(),
            Line::Run(Action::History {
                limit: HISTORY_LIMIT
            })
        );
        assert_eq!(
            parse_line("history 3").unwrap(),
            Line::Run(Action::History { limit: 3 })
        );
        assert!(matches!(
            parse_line("history zero"),
            Err(LineError::InvalidLimit(_))
        ));
    }

    #[test]
    fn summary_without_argument_queries_current_type() {
        assert_eq!(
            parse_line("summary").unwrap(),
            Line::Run(Action::Summary(None))
        );
        assert_eq!(
            parse_line("summary weekly").unwrap(),
            Line::Run(Action::Summary(Some("weekly".into())))
        );
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert_eq!(
            parse_line("fetch ai").unwrap_err(),
            LineError::UnknownCommand("fetch".into())
        );
    }
}
