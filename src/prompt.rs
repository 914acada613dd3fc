//! Yes/no confirmation collaborator.
//!
//! Creating a missing output directory needs the user's consent. The
//! controller asks through [`Confirm`] so the CLI, the interactive session
//! and tests can each answer in their own way.

use std::io::{self, BufRead, Write};

pub trait Confirm {
    /// Ask `question`; `true` means the user agreed.
    fn confirm(&self, question: &str) -> bool;
}

/// Always answers yes (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!("Auto-confirmed: {}", question.replace('\n', " "));
        true
    }
}

/// Always answers no (`--no-create`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!("Auto-declined: {}", question.replace('\n', " "));
        false
    }
}

/// Asks on the terminal, reading the answer from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stderr = io::stderr();
        ask(&mut input, &mut stderr, question).unwrap_or_else(|e| {
            tracing::warn!("Could not read confirmation: {}", e);
            false
        })
    }
}

/// Write `question` to `output` and read one answer line from `input`.
///
/// Only `y`/`yes` (any case) count as consent; EOF counts as no.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }

    Ok(is_yes(&line))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
