// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::client::fake::ScriptedTransport;
use crate::config::{ApiMode, ClientConfig};
use crate::time::FakeClock;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tempfile::TempDir;

const EXPECTED: &str = r"{\rtf1\ansi\ansicpg1252\deff0
{\fonttbl{\f0\fnil\fcharset0 Calibri;}}
\b Rapport Mensuel\b0\par
Les objectifs du trimestre sont atteints.\par
}";

const WRONG_TEXT: &str = r"{\rtf1\ansi\ansicpg1252\deff0
{\fonttbl{\f0\fnil\fcharset0 Calibri;}}
\b Liste de courses\b0\par
Pain, lait et fromage pour la semaine.\par
}";

struct Setup {
    tmp: TempDir,
    transport: Arc<ScriptedTransport>,
}

impl Setup {
    fn new(transport: ScriptedTransport) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let fixtures = tmp.path().join("fixtures");
        std::fs::create_dir_all(fixtures.join("input")).unwrap();
        std::fs::create_dir_all(fixtures.join("expected")).unwrap();
        std::fs::write(
            fixtures.join("input/sample1.txt"),
            "Convertir en RTF: Rapport Mensuel. Les objectifs du trimestre sont atteints.",
        )
        .unwrap();
        std::fs::write(fixtures.join("expected/sample1_expected.rtf"), EXPECTED).unwrap();
        Self {
            tmp,
            transport: Arc::new(transport),
        }
    }

    fn output_dir(&self) -> std::path::PathBuf {
        self.tmp.path().join("output")
    }

    fn suite_config(&self) -> SuiteConfig {
        SuiteConfig {
            fixtures_dir: self.tmp.path().join("fixtures"),
            output_dir: self.output_dir(),
            ..SuiteConfig::default()
        }
    }

    fn client(&self) -> AssistantClient {
        let config = ClientConfig {
            api_mode: ApiMode::Assistants,
            assistant_id: Some("asst_test".to_string()),
            api_key: Some("sk-test".to_string()),
            ..ClientConfig::default()
        };
        AssistantClient::new(
            config,
            self.transport.clone(),
            FakeClock::at_epoch().into(),
        )
    }

    fn runner(&self) -> SuiteRunner {
        SuiteRunner::new(self.suite_config(), Ok(self.client()), ResultLog::new())
    }
}

fn outcome_of(log: &ResultLog, name: &str) -> CaseOutcome {
    log.cases()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no case named {name}"))
        .outcome
}

#[tokio::test]
async fn conforming_assistant_passes_every_case() {
    let setup = Setup::new(ScriptedTransport::replying(EXPECTED));
    let log = SuiteRunner::open_log(&setup.output_dir()).unwrap();
    let runner = SuiteRunner::new(setup.suite_config(), Ok(setup.client()), log);

    let summary = runner.run(&RunOptions::default()).await.unwrap();

    assert_eq!(summary.passed, 10, "{:#?}", runner.log().failures());
    assert!(summary.success());
    assert!(!summary.stopped_early);

    let out = setup.output_dir();
    assert!(out.join("sample1_output.rtf").is_file());
    assert!(out.join("sample1_run1_output.rtf").is_file());
    assert!(out.join("sample1_run2_output.rtf").is_file());

    let recorded = ResultLog::load(&out.join(RESULTS_FILE)).unwrap();
    assert_eq!(recorded.len(), 10);
    assert_eq!(recorded[0].id(), "validation::header_present");
}

#[tokio::test]
async fn remote_cases_run_sequentially_one_generation_each() {
    let setup = Setup::new(ScriptedTransport::replying(EXPECTED));
    let runner = setup.runner();

    runner.run(&RunOptions::default()).await.unwrap();

    // 3 golden + 2 robustness runs + special characters + integration
    assert_eq!(setup.transport.call_count("create_run"), 7);
    let prompts = setup.transport.prompts();
    assert_eq!(prompts.len(), 7);
    assert_eq!(prompts[5], SuiteConfig::default().special_characters_prompt);
}

#[tokio::test]
async fn invalid_output_fails_after_invocation() {
    let setup = Setup::new(ScriptedTransport::replying(r"{\rtf1\ansi Hello"));
    let runner = setup.runner();

    let summary = runner.run(&RunOptions::default()).await.unwrap();

    assert!(!summary.success());
    match outcome_of(runner.log(), "format_validity[sample1]") {
        CaseOutcome::Failed { stage, reason } => {
            assert_eq!(stage, Stage::Invoked);
            assert!(reason.starts_with("Invalid RTF output: Unbalanced braces"), "{reason}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        outcome_of(runner.log(), "header_present"),
        CaseOutcome::Passed
    );
}

#[tokio::test]
async fn different_text_fails_comparison_with_missing_words() {
    let setup = Setup::new(ScriptedTransport::replying(WRONG_TEXT));
    let runner = setup.runner();

    runner.run(&RunOptions::default()).await.unwrap();

    match outcome_of(runner.log(), "content_matches_expected[sample1]") {
        CaseOutcome::Failed { stage, reason } => {
            assert_eq!(stage, Stage::Invoked);
            assert!(reason.starts_with("Text similarity too low"), "{reason}");
            assert!(reason.contains("missing: "), "{reason}");
            assert!(reason.contains("objectifs"), "{reason}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    match outcome_of(runner.log(), "full_pipeline[sample1]") {
        CaseOutcome::Failed { stage, .. } => assert_eq!(stage, Stage::Validated),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        outcome_of(runner.log(), "format_validity[sample1]"),
        CaseOutcome::Passed
    );
}

#[tokio::test]
async fn short_output_fails_special_characters() {
    let setup = Setup::new(ScriptedTransport::replying(r"{\rtf1\ansi Caf\'e9\par}"));
    let runner = setup.runner();
    let options = RunOptions {
        filter: CaseFilter {
            test: Some("special".to_string()),
            ..CaseFilter::default()
        },
        ..RunOptions::default()
    };

    let summary = runner.run(&options).await.unwrap();

    assert_eq!(summary.failed, 1);
    let reason = outcome_of(runner.log(), "special_characters")
        .diagnostic()
        .unwrap()
        .to_string();
    assert!(reason.starts_with("Output should be substantial"), "{reason}");
}

#[tokio::test]
async fn missing_credentials_fail_each_remote_case() {
    let setup = Setup::new(ScriptedTransport::new());
    let runner = SuiteRunner::new(
        setup.suite_config(),
        Err(ClientError::AuthError("OPENAI_API_KEY environment variable not set".into())),
        ResultLog::new(),
    );

    let summary = runner.run(&RunOptions::default()).await.unwrap();

    assert_eq!(summary.passed, 3);
    assert_eq!(summary.failed, 7);
    assert_eq!(summary.skipped, 0);
}

#[tokio::test]
async fn stop_on_auth_error_skips_remaining_remote_cases() {
    let setup = Setup::new(ScriptedTransport::new().failing(
        "create_thread",
        ClientError::AuthError("Incorrect API key provided".into()),
    ));
    let runner = setup.runner();
    let options = RunOptions {
        stop_on_auth_error: true,
        ..RunOptions::default()
    };

    let summary = runner.run(&options).await.unwrap();

    assert_eq!((summary.passed, summary.failed, summary.skipped), (3, 1, 6));
    assert_eq!(setup.transport.call_count("create_thread"), 1);
    let skipped = outcome_of(runner.log(), "full_pipeline[sample1]");
    assert!(skipped.is_skipped());
    assert!(skipped
        .diagnostic()
        .unwrap()
        .contains("Incorrect API key provided"));
}

#[tokio::test]
async fn fail_fast_stops_after_first_failure() {
    let setup = Setup::new(ScriptedTransport::replying(r"{\rtf1\ansi Hello"));
    let runner = setup.runner();
    let options = RunOptions {
        fail_fast: true,
        ..RunOptions::default()
    };

    let summary = runner.run(&options).await.unwrap();

    assert!(summary.stopped_early);
    assert_eq!(summary.total(), 4);
    assert_eq!(runner.log().len(), 4);
}

#[tokio::test]
async fn class_filter_runs_offline_cases_only() {
    let setup = Setup::new(ScriptedTransport::new());
    let runner = setup.runner();
    let options = RunOptions {
        filter: CaseFilter {
            class: Some("validation".to_string()),
            ..CaseFilter::default()
        },
        ..RunOptions::default()
    };

    let summary = runner.run(&options).await.unwrap();

    assert_eq!(summary.passed, 3);
    assert!(setup.transport.calls().is_empty());
}

#[tokio::test]
async fn empty_selection_is_an_error() {
    let setup = Setup::new(ScriptedTransport::new());
    let options = RunOptions {
        filter: CaseFilter {
            class: Some("nonexistent".to_string()),
            ..CaseFilter::default()
        },
        ..RunOptions::default()
    };

    let err = setup.runner().run(&options).await.unwrap_err();
    assert!(matches!(err, SuiteError::NoCases));
}

#[tokio::test]
async fn progress_sees_every_recorded_case() {
    let setup = Setup::new(ScriptedTransport::replying(EXPECTED));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let runner = setup
        .runner()
        .on_case(move |case| sink.borrow_mut().push(case.id()));

    runner.run(&RunOptions::default()).await.unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 10);
    assert_eq!(seen.last().unwrap(), "integration::full_pipeline[sample1]");
}

#[tokio::test]
async fn configured_samples_override_discovery() {
    let setup = Setup::new(ScriptedTransport::new());
    let config = SuiteConfig {
        samples: vec!["sample9".to_string()],
        ..setup.suite_config()
    };
    let runner = SuiteRunner::new(config, Ok(setup.client()), ResultLog::new());

    assert_eq!(runner.samples().unwrap(), vec!["sample9"]);

    let options = RunOptions {
        filter: CaseFilter {
            test: Some("format_validity".to_string()),
            ..CaseFilter::default()
        },
        ..RunOptions::default()
    };
    runner.run(&options).await.unwrap();
    let reason = outcome_of(runner.log(), "format_validity[sample9]")
        .diagnostic()
        .unwrap()
        .to_string();
    assert!(reason.contains("Missing input fixture for sample sample9"), "{reason}");
    assert!(setup.transport.calls().is_empty());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn unwritable_result_log_stops_the_run() {
    let setup = Setup::new(ScriptedTransport::new());
    let log = ResultLog::with_file(std::path::Path::new("/dev/full")).unwrap();
    let runner = SuiteRunner::new(setup.suite_config(), Ok(setup.client()), log);
    let options = RunOptions {
        filter: CaseFilter {
            class: Some("validation".to_string()),
            ..CaseFilter::default()
        },
        ..RunOptions::default()
    };

    let err = runner.run(&options).await.unwrap_err();

    match err {
        SuiteError::Io { path, .. } => assert_eq!(path, std::path::Path::new("/dev/full")),
        other => panic!("expected an io error, got {other:?}"),
    }
    assert_eq!(runner.log().len(), 1);
}
