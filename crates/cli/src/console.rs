// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal output for suite progress and diagnostics.
//!
//! Colors are used only when the target stream is a terminal.

use std::io::{self, IsTerminal, Write};

use rtfcheck_capture::{CapturedCase, CaseOutcome};

use crate::suite::SuiteSummary;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Print an error message to stderr.
///
/// Displays in red when stderr is a terminal, plain text otherwise.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_error(&mut io::stderr(), msg, is_tty);
}

fn write_error<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    let line = format!("Error: {msg}");
    let _ = writeln!(writer, "{}", paint(&line, RED, is_terminal));
}

/// Print a warning message to stderr.
pub fn print_warning(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_warning(&mut io::stderr(), msg, is_tty);
}

fn write_warning<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    let line = format!("Warning: {msg}");
    let _ = writeln!(writer, "{}", paint(&line, YELLOW, is_terminal));
}

/// Print one finished case to stdout
pub fn print_case(case: &CapturedCase) {
    let is_tty = io::stdout().is_terminal();
    write_case(&mut io::stdout(), case, is_tty);
}

/// `PASSED class::name (1.23s)`, with the diagnostic indented below
/// failures and skips.
fn write_case<W: Write>(writer: &mut W, case: &CapturedCase, is_terminal: bool) {
    let (label, color) = match case.outcome {
        CaseOutcome::Passed => ("PASSED ", GREEN),
        CaseOutcome::Failed { .. } => ("FAILED ", RED),
        CaseOutcome::Skipped { .. } => ("SKIPPED", YELLOW),
    };
    let _ = writeln!(
        writer,
        "{} {} ({:.2}s)",
        paint(label, color, is_terminal),
        case.id(),
        case.duration.as_secs_f64()
    );
    match &case.outcome {
        CaseOutcome::Passed => {}
        CaseOutcome::Failed { stage, reason } => {
            let _ = writeln!(writer, "        after {stage}: {reason}");
        }
        CaseOutcome::Skipped { reason } => {
            let _ = writeln!(writer, "        {reason}");
        }
    }
}

/// Print the closing summary line to stdout
pub fn print_summary(summary: &SuiteSummary) {
    let is_tty = io::stdout().is_terminal();
    write_summary(&mut io::stdout(), summary, is_tty);
}

fn write_summary<W: Write>(writer: &mut W, summary: &SuiteSummary, is_terminal: bool) {
    let color = if summary.success() { GREEN } else { RED };
    let line = format!("===== {summary} =====");
    let _ = writeln!(writer, "{}", paint(&line, color, is_terminal));
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
