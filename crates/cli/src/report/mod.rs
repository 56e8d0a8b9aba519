// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown reporting over recorded suite results.

pub mod junit;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use rtfcheck_capture::{CaseOutcome, CapturedCase};

pub use junit::{JunitReport, JunitTotals};

/// Default report file name inside the output directory
pub const REPORT_FILE: &str = "TEST_REPORT.md";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JUnit XML: {0}")]
    Xml(String),

    #[error("No results found: expected {} or a JUnit file", .0.display())]
    NoResults(PathBuf),
}

/// One case as shown in the report
#[derive(Clone, Debug, PartialEq)]
pub struct ReportEntry {
    pub class: String,
    pub name: String,
    pub outcome: CaseOutcome,
    pub duration: Duration,
}

impl ReportEntry {
    pub fn id(&self) -> String {
        format!("{}::{}", self.class, self.name)
    }
}

impl From<&CapturedCase> for ReportEntry {
    fn from(case: &CapturedCase) -> Self {
        Self {
            class: case.class.clone(),
            name: case.name.clone(),
            outcome: case.outcome.clone(),
            duration: case.duration,
        }
    }
}

/// Outcome counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Totals {
    /// Passed share of all cases in percent; 0.0 for an empty run
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Suite report built from result entries
pub struct SuiteReport {
    entries: Vec<ReportEntry>,
    generated_at: Option<String>,
    model: Option<String>,
    outputs: Vec<String>,
    junit: Option<(String, JunitTotals)>,
}

impl SuiteReport {
    pub fn new(entries: Vec<ReportEntry>) -> Self {
        Self {
            entries,
            generated_at: None,
            model: None,
            outputs: Vec::new(),
            junit: None,
        }
    }

    pub fn from_cases(cases: &[CapturedCase]) -> Self {
        Self::new(cases.iter().map(ReportEntry::from).collect())
    }

    /// Set generation timestamp
    pub fn with_generated_at(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = Some(timestamp.into());
        self
    }

    /// Set the model or assistant identifier under test
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the generated document names to list
    pub fn with_outputs(mut self, outputs: Vec<String>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Fold in a parsed JUnit file.
    ///
    /// Cases already present (same class and name) are kept as recorded;
    /// the others are appended. The file's own totals are shown separately.
    pub fn merge_junit(&mut self, source: impl Into<String>, junit: JunitReport) {
        let known: HashSet<String> = self.entries.iter().map(ReportEntry::id).collect();
        self.entries.extend(
            junit
                .entries
                .into_iter()
                .filter(|entry| !known.contains(&entry.id())),
        );
        self.junit = Some((source.into(), junit.totals));
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn totals(&self) -> Totals {
        let mut totals = Totals {
            total: self.entries.len(),
            ..Totals::default()
        };
        for entry in &self.entries {
            match entry.outcome {
                CaseOutcome::Passed => totals.passed += 1,
                CaseOutcome::Failed { .. } => totals.failed += 1,
                CaseOutcome::Skipped { .. } => totals.skipped += 1,
            }
        }
        totals
    }

    /// Entries grouped by class, classes in order of first appearance
    pub fn entries_by_class(&self) -> Vec<(&str, Vec<&ReportEntry>)> {
        let mut groups: Vec<(&str, Vec<&ReportEntry>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(class, _)| *class == entry.class) {
                Some((_, items)) => items.push(entry),
                None => groups.push((entry.class.as_str(), vec![entry])),
            }
        }
        groups
    }

    /// Generate markdown report
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# RTF Conversion Test Report\n\n");

        if let Some(timestamp) = &self.generated_at {
            md.push_str(&format!("Generated: {}\n", timestamp));
        }
        if let Some(model) = &self.model {
            md.push_str(&format!("Model: `{}`\n", model));
        }
        md.push('\n');

        let totals = self.totals();
        md.push_str("## Summary\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Total | {} |\n", totals.total));
        md.push_str(&format!("| Passed | {} |\n", totals.passed));
        md.push_str(&format!("| Failed | {} |\n", totals.failed));
        md.push_str(&format!("| Skipped | {} |\n", totals.skipped));
        md.push_str(&format!("| Pass rate | {:.1}% |\n", totals.pass_rate()));
        md.push('\n');

        if let Some((source, junit)) = &self.junit {
            md.push_str(&format!(
                "JUnit results (`{}`): {} tests, {} failures, {} errors, {} skipped in {:.2}s\n\n",
                source, junit.tests, junit.failures, junit.errors, junit.skipped, junit.time
            ));
        }

        for (class, entries) in self.entries_by_class() {
            md.push_str(&format!("## {}\n\n", class));
            md.push_str("| Test | Status | Duration | Details |\n");
            md.push_str("|------|--------|----------|---------|\n");
            for entry in entries {
                let icon = match entry.outcome {
                    CaseOutcome::Passed => "✅",
                    CaseOutcome::Failed { .. } => "❌",
                    CaseOutcome::Skipped { .. } => "⏭️",
                };
                let details = match &entry.outcome {
                    CaseOutcome::Failed { stage, reason } => {
                        format!("{} (after {})", table_cell(reason), stage)
                    }
                    outcome => outcome.diagnostic().map(table_cell).unwrap_or_default(),
                };
                md.push_str(&format!(
                    "| `{}` | {} {} | {:.2}s | {} |\n",
                    entry.name,
                    icon,
                    entry.outcome.label(),
                    entry.duration.as_secs_f64(),
                    details
                ));
            }
            md.push('\n');
        }

        md.push_str("## Generated Outputs\n\n");
        if self.outputs.is_empty() {
            md.push_str("No RTF outputs found.\n");
        } else {
            for output in &self.outputs {
                md.push_str(&format!("- `{}`\n", output));
            }
        }

        md
    }
}

/// Keep a diagnostic on one table row
fn table_cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
