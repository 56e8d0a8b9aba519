// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line interface for the harness.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::client::prompt::{DEFAULT_ASSISTANT_DESCRIPTION, DEFAULT_ASSISTANT_NAME};
use crate::config::{ApiMode, HarnessConfig};
use crate::suite::{CaseFilter, RunOptions};

/// Prompt sent by `probe` when none is given
pub const DEFAULT_PROBE_PROMPT: &str = "Convertir en RTF: Test";

/// Conformance harness for an RTF-generating assistant
#[derive(Parser, Debug)]
#[command(name = "rtfcheck", version)]
#[command(about = "Run RTF conformance suites against a remote assistant")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: rtfcheck.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dotenv file loaded before reading the environment
    #[arg(long, global = true, value_name = "FILE", default_value = ".env")]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the conformance suite
    Run(RunArgs),

    /// Render TEST_REPORT.md from recorded results
    Report(ReportArgs),

    /// Check RTF files offline
    Validate {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Also report corruption patterns
        #[arg(long)]
        strict: bool,
    },

    /// Send one prompt and print diagnostics about the reply
    Probe {
        #[arg(value_name = "PROMPT", default_value = DEFAULT_PROBE_PROMPT)]
        prompt: String,

        /// Generation timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Manage the remote assistant
    #[command(subcommand)]
    Assistant(AssistantCommand),
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Directory holding input/ and expected/
    #[arg(long, value_name = "DIR")]
    pub fixtures_dir: Option<PathBuf>,

    /// Directory for generated documents and results
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only run classes containing this text
    #[arg(long)]
    pub class: Option<String>,

    /// Only run tests whose name contains this text
    #[arg(long)]
    pub test: Option<String>,

    /// Stop after the first failure
    #[arg(short = 'x', long)]
    pub fail_fast: bool,

    /// Also write results as JUnit XML
    #[arg(long, value_name = "FILE")]
    pub junit_xml: Option<PathBuf>,

    /// Per-generation timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip remaining remote cases after an authentication failure
    #[arg(long)]
    pub stop_on_auth_error: bool,

    /// Remote API flavor
    #[arg(long, value_enum)]
    pub api_mode: Option<ApiMode>,
}

impl RunArgs {
    /// Apply flag overrides on top of file and environment values
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(dir) = &self.fixtures_dir {
            config.suite.fixtures_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.suite.output_dir = dir.clone();
        }
        if let Some(secs) = self.timeout {
            config.client.timeout_secs = secs;
        }
        if let Some(mode) = self.api_mode {
            config.client.api_mode = mode;
        }
        if self.stop_on_auth_error {
            config.suite.stop_on_auth_error = true;
        }
    }

    pub fn options(&self, config: &HarnessConfig) -> RunOptions {
        RunOptions {
            filter: CaseFilter {
                class: self.class.clone(),
                test: self.test.clone(),
            },
            fail_fast: self.fail_fast,
            stop_on_auth_error: config.suite.stop_on_auth_error,
            timeout: Duration::from_secs(config.client.timeout_secs),
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct ReportArgs {
    /// Directory holding results and generated documents
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSONL result log (default: <output-dir>/results.jsonl)
    #[arg(long, value_name = "FILE")]
    pub results: Option<PathBuf>,

    /// JUnit XML file to merge in
    #[arg(long, value_name = "FILE")]
    pub junit: Option<PathBuf>,

    /// Report destination (default: <output-dir>/TEST_REPORT.md)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Model or assistant id shown in the header
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AssistantCommand {
    /// Create an assistant with the RTF instructions
    Create {
        #[arg(long, default_value = DEFAULT_ASSISTANT_NAME)]
        name: String,

        #[arg(long, default_value = DEFAULT_ASSISTANT_DESCRIPTION)]
        description: String,

        /// Model backing the assistant
        #[arg(long)]
        model: Option<String>,

        /// Write the new id to the dotenv file as OPENAI_ASSISTANT_ID
        #[arg(long)]
        save: bool,
    },

    /// Replace the configured assistant's instructions
    Update,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
