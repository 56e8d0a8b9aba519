// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline RTF checks from the command line.

use clap::{Parser, Subcommand};
use rtf_check::{
    assert_similar, check_corruption, extract_visible_text, missing_words, validate, word_diff,
    DEFAULT_TOLERANCE, VALID_RTF,
};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Validate RTF files and compare their visible text
#[derive(Parser, Debug)]
#[command(name = "rtf-check", version)]
#[command(about = "Validate RTF structure and compare visible text")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check header, brace balance and character set of a file
    Validate {
        file: PathBuf,

        /// Also report corruption patterns (missing \par, trailing text)
        #[arg(long)]
        strict: bool,
    },
    /// Compare the visible text of two RTF files
    Compare {
        actual: PathBuf,
        expected: PathBuf,

        /// Minimum word-overlap ratio
        #[arg(long, default_value_t = DEFAULT_TOLERANCE, value_parser = parse_tolerance)]
        tolerance: f64,

        /// Print a word diff when the comparison fails
        #[arg(long)]
        diff: bool,
    },
    /// Print the visible text of a file
    Extract { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Print an error to stderr, in red when stderr is a terminal.
fn print_error(msg: impl std::fmt::Display) {
    let mut stderr = io::stderr();
    let line = format!("Error: {msg}");
    let _ = if stderr.is_terminal() {
        writeln!(stderr, "\x1b[31m{line}\x1b[0m")
    } else {
        writeln!(stderr, "{line}")
    };
}

/// Ratio in `0.0..=1.0`; NaN is rejected with the rest.
fn parse_tolerance(arg: &str) -> Result<f64, String> {
    let value: f64 = arg.trim().parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside 0.0..=1.0"))
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn read(path: &Path) -> Result<String, std::io::Error> {
    std::fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
    })
}

/// Returns whether the check passed.
fn run(command: Command) -> Result<bool, std::io::Error> {
    match command {
        Command::Validate { file, strict } => {
            let content = read(&file)?;
            if let Err(e) = validate(&content) {
                println!("{}: {} ({})", file.display(), e.kind(), e);
                return Ok(false);
            }
            if strict {
                let found = check_corruption(&content);
                if !found.is_empty() {
                    for corruption in &found {
                        println!("{}: {}", file.display(), corruption);
                    }
                    return Ok(false);
                }
            }
            println!("{}: {}", file.display(), VALID_RTF);
            Ok(true)
        }
        Command::Compare {
            actual,
            expected,
            tolerance,
            diff,
        } => {
            let actual_text = extract_visible_text(&read(&actual)?);
            let expected_text = extract_visible_text(&read(&expected)?);
            tracing::debug!(actual = %actual_text, expected = %expected_text, "extracted text");

            match assert_similar(&actual_text, &expected_text, tolerance) {
                Ok(score) => {
                    println!(
                        "similarity {:.2}% ({} of {} words)",
                        score.ratio * 100.0,
                        score.matched,
                        score.expected
                    );
                    Ok(true)
                }
                Err(e) => {
                    println!("{}", e);
                    let missing = missing_words(&actual_text, &expected_text);
                    if !missing.is_empty() {
                        println!("missing: {}", missing.join(" "));
                    }
                    if diff {
                        println!("{}", word_diff(&actual_text, &expected_text));
                    }
                    Ok(false)
                }
            }
        }
        Command::Extract { file } => {
            println!("{}", extract_visible_text(&read(&file)?));
            Ok(true)
        }
    }
}
