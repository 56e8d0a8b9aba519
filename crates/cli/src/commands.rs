// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand implementations. Each returns whether the command succeeded.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rtf_check::{check, check_corruption, RTF_HEADER, VALID_RTF};
use rtfcheck_capture::ResultLog;

use crate::cli::{AssistantCommand, ReportArgs, RunArgs};
use crate::client::prompt::RTF_SYSTEM_PROMPT;
use crate::client::{AssistantClient, ClientError};
use crate::config::{ConfigError, HarnessConfig};
use crate::console::{print_case, print_summary, print_warning};
use crate::env;
use crate::fixtures::{list_rtf_files, FixtureError};
use crate::report::{junit, ReportEntry, ReportError, SuiteReport, REPORT_FILE};
use crate::suite::{SuiteError, SuiteRunner, RESULTS_FILE};

/// Suite name used in JUnit output
pub const JUNIT_SUITE_NAME: &str = "rtfcheck";

/// Characters of the reply echoed by `probe`
const PROBE_PREVIEW_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Suite(#[from] SuiteError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CommandError + '_ {
    move |source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load the dotenv file, then the config file, then the environment.
pub fn load_config(explicit: Option<&Path>, env_file: &Path) -> Result<HarnessConfig, CommandError> {
    let loaded = env::load_dotenv(env_file).map_err(io_error(env_file))?;
    if loaded > 0 {
        tracing::debug!(path = %env_file.display(), vars = loaded, "loaded dotenv file");
    }
    let mut config = HarnessConfig::discover(explicit)?;
    config.apply_env();
    Ok(config)
}

pub async fn run(mut config: HarnessConfig, args: &RunArgs) -> Result<bool, CommandError> {
    args.apply(&mut config);
    config.validate()?;
    let options = args.options(&config);

    let client = AssistantClient::from_config(config.client.clone());
    match &client {
        Ok(client) => {
            let token = client.cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupted, cancelling");
                    token.cancel();
                }
            });
        }
        Err(e) => print_warning(format_args!("remote cases will fail: {e}")),
    }

    let log = SuiteRunner::open_log(&config.suite.output_dir)?;
    let runner = SuiteRunner::new(config.suite.clone(), client, log).on_case(print_case);
    let summary = runner.run(&options).await?;
    print_summary(&summary);

    if let Some(path) = &args.junit_xml {
        let entries: Vec<ReportEntry> = runner.log().cases().iter().map(ReportEntry::from).collect();
        junit::write_file(path, JUNIT_SUITE_NAME, &entries)?;
        tracing::info!(path = %path.display(), "wrote JUnit XML");
    }
    Ok(summary.success())
}

/// Build the Markdown report and return where it was written
pub fn report(config: &HarnessConfig, args: &ReportArgs) -> Result<PathBuf, CommandError> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.suite.output_dir.clone());
    let results = args
        .results
        .clone()
        .unwrap_or_else(|| output_dir.join(RESULTS_FILE));

    let mut report = if results.is_file() {
        let cases = ResultLog::load(&results).map_err(io_error(&results))?;
        SuiteReport::from_cases(&cases)
    } else if args.junit.is_some() {
        SuiteReport::new(Vec::new())
    } else {
        return Err(ReportError::NoResults(results).into());
    };

    if let Some(path) = &args.junit {
        report.merge_junit(path.display().to_string(), junit::read_file(path)?);
    }

    let outputs = list_rtf_files(&output_dir)?
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    let model = args
        .model
        .clone()
        .or_else(|| config.client.assistant_id.clone())
        .unwrap_or_else(|| config.client.model.clone());
    let report = report
        .with_generated_at(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
        .with_model(model)
        .with_outputs(outputs);

    let out = args.out.clone().unwrap_or_else(|| output_dir.join(REPORT_FILE));
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    std::fs::write(&out, report.to_markdown()).map_err(io_error(&out))?;
    Ok(out)
}

/// Check each file, printing one line per finding
pub fn validate<W: Write>(
    out: &mut W,
    files: &[PathBuf],
    strict: bool,
) -> Result<bool, CommandError> {
    let mut all_valid = true;
    for file in files {
        let content = std::fs::read_to_string(file).map_err(io_error(file))?;
        let result = check(&content);
        if !result.is_valid {
            writeln!(out, "{}: {}", file.display(), result.reason)
                .map_err(CommandError::Output)?;
            all_valid = false;
            continue;
        }
        let found = if strict {
            check_corruption(&content)
        } else {
            Vec::new()
        };
        if found.is_empty() {
            writeln!(out, "{}: {}", file.display(), VALID_RTF)
                .map_err(CommandError::Output)?;
        } else {
            for corruption in &found {
                writeln!(out, "{}: {}", file.display(), corruption)
                    .map_err(CommandError::Output)?;
            }
            all_valid = false;
        }
    }
    Ok(all_valid)
}

pub async fn probe(
    mut config: HarnessConfig,
    prompt: &str,
    timeout: Option<u64>,
) -> Result<bool, CommandError> {
    if let Some(secs) = timeout {
        config.client.timeout_secs = secs;
    }
    config.validate()?;
    let client = AssistantClient::from_config(config.client.clone())?;
    let reply = client
        .generate(prompt, Duration::from_secs(config.client.timeout_secs))
        .await?;
    let (text, valid) = describe_reply(&reply);
    print!("{text}");
    Ok(valid)
}

/// Human-readable diagnostics for one reply, and whether it is valid RTF
pub fn describe_reply(reply: &str) -> (String, bool) {
    let validation = check(reply);
    let corruption = check_corruption(reply);
    let mut text = String::new();
    text.push_str(&format!(
        "Length: {} chars, {} lines\n",
        reply.chars().count(),
        reply.lines().count()
    ));
    text.push_str(&format!(
        "Starts with {}: {}\n",
        RTF_HEADER,
        if reply.trim_start().starts_with(RTF_HEADER) {
            "yes"
        } else {
            "no"
        }
    ));
    if validation.is_valid {
        text.push_str(&format!("Validation: {}\n", VALID_RTF));
    } else {
        text.push_str(&format!("Validation: invalid ({})\n", validation.reason));
    }
    if corruption.is_empty() {
        text.push_str("Corruption: none\n");
    } else {
        for found in &corruption {
            text.push_str(&format!("Corruption: {}\n", found));
        }
    }
    let preview: String = reply.chars().take(PROBE_PREVIEW_CHARS).collect();
    text.push_str("--- reply ---\n");
    text.push_str(&preview);
    if reply.chars().count() > PROBE_PREVIEW_CHARS {
        text.push_str("...");
    }
    text.push('\n');
    (text, validation.is_valid)
}

pub async fn assistant(
    mut config: HarnessConfig,
    command: &AssistantCommand,
    env_file: &Path,
) -> Result<bool, CommandError> {
    match command {
        AssistantCommand::Create {
            name,
            description,
            model,
            save,
        } => {
            if let Some(model) = model {
                config.client.model = model.clone();
            }
            let client = AssistantClient::from_config(config.client)?;
            let created = client
                .create_assistant(name, description, RTF_SYSTEM_PROMPT)
                .await?;
            println!("Created assistant {} ({})", created.id, created.model);
            if *save {
                env::upsert_dotenv(env_file, env::OPENAI_ASSISTANT_ID, &created.id)
                    .map_err(io_error(env_file))?;
                println!(
                    "Saved {}={} to {}",
                    env::OPENAI_ASSISTANT_ID,
                    created.id,
                    env_file.display()
                );
            } else {
                println!("Set {}={}", env::OPENAI_ASSISTANT_ID, created.id);
            }
        }
        AssistantCommand::Update => {
            let client = AssistantClient::from_config(config.client)?;
            let updated = client.update_assistant(RTF_SYSTEM_PROMPT).await?;
            println!("Updated assistant {} ({})", updated.id, updated.model);
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
