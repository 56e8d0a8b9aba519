// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use std::path::Path;

fn run_args(args: &[&str]) -> RunArgs {
    let argv: Vec<&str> = ["rtfcheck", "run"].iter().chain(args).copied().collect();
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Run(args) => args,
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn test_parse_run_defaults() {
    let cli = Cli::try_parse_from(["rtfcheck", "run"]).unwrap();
    assert_eq!(cli.verbose, 0);
    assert_eq!(cli.env_file, Path::new(".env"));
    assert!(cli.config.is_none());
    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert!(!args.fail_fast);
    assert!(args.junit_xml.is_none());
}

#[test]
fn test_parse_run_filters() {
    let args = run_args(&["--class", "golden", "--test", "sample1", "-x"]);
    assert_eq!(args.class.as_deref(), Some("golden"));
    assert_eq!(args.test.as_deref(), Some("sample1"));
    assert!(args.fail_fast);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["rtfcheck", "run", "-vv", "--config", "ci.toml"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some(Path::new("ci.toml")));
}

#[test]
fn test_run_overrides_config() {
    let args = run_args(&[
        "--fixtures-dir",
        "fx",
        "--output-dir",
        "out",
        "--timeout",
        "5",
        "--api-mode",
        "chat",
        "--stop-on-auth-error",
    ]);
    let mut config = HarnessConfig::default();
    args.apply(&mut config);

    assert_eq!(config.suite.fixtures_dir, Path::new("fx"));
    assert_eq!(config.suite.output_dir, Path::new("out"));
    assert_eq!(config.client.timeout_secs, 5);
    assert_eq!(config.client.api_mode, ApiMode::Chat);
    assert!(config.suite.stop_on_auth_error);

    let options = args.options(&config);
    assert_eq!(options.timeout, Duration::from_secs(5));
    assert!(options.stop_on_auth_error);
}

#[test]
fn test_absent_flags_keep_config() {
    let mut config = HarnessConfig::default();
    config.suite.stop_on_auth_error = true;
    config.client.timeout_secs = 90;
    run_args(&[]).apply(&mut config);

    assert!(config.suite.stop_on_auth_error);
    assert_eq!(config.client.timeout_secs, 90);
    assert_eq!(config.suite.fixtures_dir, Path::new("tests/fixtures"));
}

#[test]
fn test_parse_validate_requires_files() {
    assert!(Cli::try_parse_from(["rtfcheck", "validate"]).is_err());
    let cli = Cli::try_parse_from(["rtfcheck", "validate", "a.rtf", "b.rtf", "--strict"]).unwrap();
    let Command::Validate { files, strict } = cli.command else {
        panic!("expected validate");
    };
    assert_eq!(files.len(), 2);
    assert!(strict);
}

#[test]
fn test_probe_default_prompt() {
    let cli = Cli::try_parse_from(["rtfcheck", "probe"]).unwrap();
    let Command::Probe { prompt, timeout } = cli.command else {
        panic!("expected probe");
    };
    assert_eq!(prompt, DEFAULT_PROBE_PROMPT);
    assert!(timeout.is_none());
}

#[test]
fn test_parse_report_args() {
    let cli = Cli::try_parse_from([
        "rtfcheck",
        "report",
        "--junit",
        "junit.xml",
        "--model",
        "asst_1",
    ])
    .unwrap();
    let Command::Report(args) = cli.command else {
        panic!("expected report");
    };
    assert_eq!(args.junit.as_deref(), Some(Path::new("junit.xml")));
    assert_eq!(args.model.as_deref(), Some("asst_1"));
    assert!(args.out.is_none());
}

#[test]
fn test_parse_assistant_create() {
    let cli = Cli::try_parse_from(["rtfcheck", "assistant", "create", "--save"]).unwrap();
    let Command::Assistant(AssistantCommand::Create {
        name, model, save, ..
    }) = cli.command
    else {
        panic!("expected assistant create");
    };
    assert_eq!(name, DEFAULT_ASSISTANT_NAME);
    assert!(model.is_none());
    assert!(save);
}

#[test]
fn test_unknown_api_mode_rejected() {
    assert!(Cli::try_parse_from(["rtfcheck", "run", "--api-mode", "responses"]).is_err());
}
