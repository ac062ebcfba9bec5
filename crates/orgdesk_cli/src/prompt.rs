//! Terminal prompting seam.
//!
//! # Responsibility
//! - Collect user input behind a trait so command flows stay testable with
//!   canned answers.
//! - Parse numeric and comma-separated id inputs.
//!
//! # Invariants
//! - Numeric prompts re-prompt until a positive integer is supplied.
//! - Id-list parsing never fails; bad tokens are returned for reporting.

use colored::Colorize;
use orgdesk_core::EntityId;
use std::io::{self, BufRead, Write};

/// Thin input adapter between command flows and the terminal.
pub trait Prompter {
    /// Shows `message` and returns one trimmed input line.
    fn prompt_line(&mut self, message: &str) -> io::Result<String>;
}

/// Production prompter reading from stdin.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn prompt_line(&mut self, message: &str) -> io::Result<String> {
        print!("{message}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// Prompts until the user supplies a positive integer id.
pub fn prompt_positive_id<P: Prompter>(prompter: &mut P, message: &str) -> io::Result<EntityId> {
    loop {
        let line = prompter.prompt_line(message)?;
        match line.parse::<EntityId>() {
            Ok(id) if id > 0 => return Ok(id),
            _ => println!("{}", "ID must be a positive integer".red()),
        }
    }
}

/// Like `prompt_positive_id`, but a blank line means "skip".
pub fn prompt_optional_id<P: Prompter>(
    prompter: &mut P,
    message: &str,
) -> io::Result<Option<EntityId>> {
    loop {
        let line = prompter.prompt_line(message)?;
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<EntityId>() {
            Ok(id) if id > 0 => return Ok(Some(id)),
            _ => println!("{}", "ID must be a positive integer (or blank to skip)".red()),
        }
    }
}

/// Asks a yes/no question; anything but `y`/`yes` counts as no.
pub fn prompt_yes_no<P: Prompter>(prompter: &mut P, message: &str) -> io::Result<bool> {
    let line = prompter.prompt_line(message)?;
    Ok(matches!(line.to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Splits comma-separated input into positive ids and unparsable tokens.
pub fn parse_id_list(input: &str) -> (Vec<EntityId>, Vec<String>) {
    let mut ids = Vec::new();
    let mut bad_tokens = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<EntityId>() {
            Ok(id) if id > 0 => ids.push(id),
            _ => bad_tokens.push(token.to_string()),
        }
    }
    (ids, bad_tokens)
}

#[cfg(test)]
mod tests {
    use super::parse_id_list;

    #[test]
    fn parses_well_formed_list() {
        let (ids, bad) = parse_id_list("1, 2,3");
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(bad.is_empty());
    }

    #[test]
    fn collects_bad_tokens_without_failing() {
        let (ids, bad) = parse_id_list("4, x, -2, 7,");
        assert_eq!(ids, vec![4, 7]);
        assert_eq!(bad, vec!["x".to_string(), "-2".to_string()]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let (ids, bad) = parse_id_list("   ");
        assert!(ids.is_empty());
        assert!(bad.is_empty());
    }
}
