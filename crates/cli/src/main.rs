// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rtfcheck binary entry point.

use std::process::ExitCode;

use clap::Parser;

use rtfcheck::cli::{Cli, Command};
use rtfcheck::commands::{self, CommandError};
use rtfcheck::console::print_error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(e);
            ExitCode::FAILURE
        }
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

async fn dispatch(cli: Cli) -> Result<bool, CommandError> {
    let load = || commands::load_config(cli.config.as_deref(), &cli.env_file);
    match &cli.command {
        Command::Validate { files, strict } => {
            commands::validate(&mut std::io::stdout(), files, *strict)
        }
        Command::Run(args) => commands::run(load()?, args).await,
        Command::Report(args) => {
            let path = commands::report(&load()?, args)?;
            println!("Report written to {}", path.display());
            Ok(true)
        }
        Command::Probe { prompt, timeout } => commands::probe(load()?, prompt, *timeout).await,
        Command::Assistant(command) => {
            commands::assistant(load()?, command, &cli.env_file).await
        }
    }
}
