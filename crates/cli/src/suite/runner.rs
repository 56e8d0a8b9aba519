// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential execution of the case catalog.

use std::path::Path;
use std::time::{Duration, Instant};

use rtf_check::{
    assert_similar, check, check_corruption, extract_visible_text, missing_words, validate,
    word_diff,
};
use rtfcheck_capture::{CaseOutcome, CapturedCase, ResultLog, Stage};

use super::case::{CaseError, CaseRun};
use super::catalog::{catalog, CaseFilter, SuiteCase};
use super::SuiteError;
use crate::client::{AssistantClient, ClientError};
use crate::config::SuiteConfig;
use crate::fixtures::FixtureStore;

/// File name of the JSONL result log inside the output directory
pub const RESULTS_FILE: &str = "results.jsonl";

/// Per-invocation controls
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub filter: CaseFilter,
    /// Stop after the first failed case
    pub fail_fast: bool,
    /// Skip remaining remote cases after an authentication failure
    pub stop_on_auth_error: bool,
    /// Budget for each remote generation
    pub timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            filter: CaseFilter::default(),
            fail_fast: false,
            stop_on_auth_error: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome counts for one suite run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Fail-fast or cancellation ended the run before the last case
    pub stopped_early: bool,
    pub elapsed: Duration,
}

impl SuiteSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    fn count(&mut self, outcome: &CaseOutcome) {
        match outcome {
            CaseOutcome::Passed => self.passed += 1,
            CaseOutcome::Failed { .. } => self.failed += 1,
            CaseOutcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

impl std::fmt::Display for SuiteSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped in {:.2}s",
            self.passed,
            self.failed,
            self.skipped,
            self.elapsed.as_secs_f64()
        )?;
        if self.stopped_early {
            write!(f, " (stopped early)")?;
        }
        Ok(())
    }
}

type Progress = Box<dyn Fn(&CapturedCase)>;

/// Runs cases one at a time against one client
pub struct SuiteRunner {
    config: SuiteConfig,
    fixtures: FixtureStore,
    client: Result<AssistantClient, ClientError>,
    log: ResultLog,
    progress: Option<Progress>,
}

impl SuiteRunner {
    /// `client` may be an error (e.g. no API key); remote cases then fail
    /// with it while offline cases still run.
    pub fn new(
        config: SuiteConfig,
        client: Result<AssistantClient, ClientError>,
        log: ResultLog,
    ) -> Self {
        let fixtures = FixtureStore::new(&config.fixtures_dir, &config.output_dir);
        Self {
            config,
            fixtures,
            client,
            log,
            progress: None,
        }
    }

    /// Create the output directory and a result log streaming to it
    pub fn open_log(output_dir: &Path) -> Result<ResultLog, SuiteError> {
        std::fs::create_dir_all(output_dir).map_err(|source| SuiteError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let path = output_dir.join(RESULTS_FILE);
        ResultLog::with_file(&path).map_err(|source| SuiteError::Io { path, source })
    }

    /// Called after each recorded case
    pub fn on_case(mut self, progress: impl Fn(&CapturedCase) + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    /// Configured samples, or those discovered in the fixtures directory
    pub fn samples(&self) -> Result<Vec<String>, SuiteError> {
        if !self.config.samples.is_empty() {
            return Ok(self.config.samples.clone());
        }
        Ok(self.fixtures.discover_samples()?)
    }

    /// Cases selected by `filter`, in execution order
    pub fn select(&self, filter: &CaseFilter) -> Result<Vec<SuiteCase>, SuiteError> {
        let samples = self.samples()?;
        Ok(catalog(&samples, self.config.robustness_runs)
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect())
    }

    pub async fn run(&self, options: &RunOptions) -> Result<SuiteSummary, SuiteError> {
        let cases = self.select(&options.filter)?;
        if cases.is_empty() {
            return Err(SuiteError::NoCases);
        }
        tracing::info!(cases = cases.len(), "starting suite");

        let started = Instant::now();
        let mut summary = SuiteSummary::default();
        let mut auth_failure: Option<String> = None;

        for case in &cases {
            let began = Instant::now();
            let mut cancelled = false;
            let outcome = match &auth_failure {
                Some(reason) if case.is_remote() => {
                    CaseOutcome::skipped(format!("Skipped after authentication failure: {reason}"))
                }
                _ => {
                    let mut run = CaseRun::new();
                    match self.execute(case, &mut run, options.timeout).await {
                        Ok(()) => run.finish(),
                        Err(e) => {
                            if options.stop_on_auth_error && e.is_auth() {
                                tracing::warn!(case = %case.id(), "authentication failed, skipping remote cases");
                                auth_failure = Some(e.to_string());
                            }
                            cancelled = matches!(e, CaseError::Client(ClientError::Cancelled));
                            run.fail(e.to_string())
                        }
                    }
                }
            };

            let recorded = self
                .log
                .record(case.class(), case.name(), outcome, began.elapsed())
                .map_err(|source| SuiteError::Io {
                    path: self.log.path().map(Path::to_path_buf).unwrap_or_default(),
                    source,
                })?;
            tracing::info!(
                case = %recorded.id(),
                status = recorded.outcome.label(),
                duration_ms = recorded.duration.as_millis() as u64,
                "case finished"
            );
            summary.count(&recorded.outcome);
            if let Some(progress) = &self.progress {
                progress(&recorded);
            }

            if cancelled || (options.fail_fast && recorded.outcome.is_failed()) {
                summary.stopped_early = true;
                break;
            }
        }

        summary.elapsed = started.elapsed();
        Ok(summary)
    }

    async fn execute(
        &self,
        case: &SuiteCase,
        run: &mut CaseRun,
        timeout: Duration,
    ) -> Result<(), CaseError> {
        match case {
            SuiteCase::HeaderPresent => {
                let result = check(r"{\rtf1\ansi test}");
                run.reach(Stage::Validated);
                if !result.is_valid {
                    return Err(CaseError::Assertion(format!(
                        "Valid RTF should pass: {}",
                        result.reason
                    )));
                }
            }
            SuiteCase::UnbalancedBraces => {
                let result = check(r"{\rtf1\ansi test");
                run.reach(Stage::Validated);
                if result.is_valid {
                    return Err(CaseError::Assertion(
                        "Unbalanced braces should fail".to_string(),
                    ));
                }
                if !result.reason.to_lowercase().contains("brace") {
                    return Err(CaseError::Assertion(format!(
                        "Expected a brace diagnostic, got {}",
                        result.reason
                    )));
                }
            }
            SuiteCase::EmptyContent => {
                let result = check("");
                run.reach(Stage::Validated);
                if result.is_valid {
                    return Err(CaseError::Assertion("Empty content should fail".to_string()));
                }
            }
            SuiteCase::FormatValidity { sample } => {
                let prompt = self.fixtures.load_prompt(sample)?;
                let output = self.generate(&prompt, run, timeout).await?;
                self.fixtures.save_output(sample, &output)?;
                validate(&output)?;
                run.reach(Stage::Validated);
            }
            SuiteCase::ContentMatchesExpected { sample } => {
                let prompt = self.fixtures.load_prompt(sample)?;
                let expected = self.fixtures.load_expected(sample)?;
                let output = self.generate(&prompt, run, timeout).await?;
                self.fixtures.save_output(sample, &output)?;
                compare(&output, &expected, self.config.tolerance, run)?;
            }
            SuiteCase::NoCorruption { sample } => {
                let prompt = self.fixtures.load_prompt(sample)?;
                let output = self.generate(&prompt, run, timeout).await?;
                let found = check_corruption(&output);
                if !found.is_empty() {
                    return Err(CaseError::Corruption(found));
                }
                run.reach(Stage::Validated);
            }
            SuiteCase::ConsistentOutputFormat {
                sample,
                run: attempt,
            } => {
                let prompt = self.fixtures.load_prompt(sample)?;
                let output = self.generate(&prompt, run, timeout).await?;
                self.fixtures
                    .save_output(&format!("{sample}_run{attempt}"), &output)?;
                validate(&output)?;
                run.reach(Stage::Validated);
            }
            SuiteCase::SpecialCharacters => {
                let prompt = &self.config.special_characters_prompt;
                let output = self.generate(prompt, run, timeout).await?;
                validate(&output)?;
                run.reach(Stage::Validated);
                let len = output.chars().count();
                if len <= self.config.min_output_len {
                    return Err(CaseError::Assertion(format!(
                        "Output should be substantial: {len} characters, expected more than {}",
                        self.config.min_output_len
                    )));
                }
            }
            SuiteCase::FullPipeline { sample } => {
                let prompt = self.fixtures.load_prompt(sample)?;
                let expected = self.fixtures.load_expected(sample)?;
                let output = self.generate(&prompt, run, timeout).await?;
                validate(&output)?;
                run.reach(Stage::Validated);
                compare(&output, &expected, self.config.integration_tolerance, run)?;
            }
        }
        Ok(())
    }

    async fn generate(
        &self,
        prompt: &str,
        run: &mut CaseRun,
        timeout: Duration,
    ) -> Result<String, CaseError> {
        let client = self.client.as_ref().map_err(Clone::clone)?;
        let output = client.generate(prompt, timeout).await?;
        run.reach(Stage::Invoked);
        Ok(output)
    }
}

/// Compare the visible text of two documents at `tolerance`.
fn compare(
    output: &str,
    expected: &str,
    tolerance: f64,
    run: &mut CaseRun,
) -> Result<(), CaseError> {
    let actual_text = extract_visible_text(output);
    let expected_text = extract_visible_text(expected);
    match assert_similar(&actual_text, &expected_text, tolerance) {
        Ok(score) => {
            tracing::debug!(ratio = score.ratio, tolerance, "text similarity");
            run.reach(Stage::Compared);
            Ok(())
        }
        Err(error) => {
            tracing::debug!(diff = %word_diff(&actual_text, &expected_text), "text differs");
            Err(CaseError::Similarity {
                error,
                missing: missing_words(&actual_text, &expected_text),
            })
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
