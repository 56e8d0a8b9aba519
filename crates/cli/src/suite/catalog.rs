// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The fixed set of test cases and their selection filters.

pub const VALIDATION: &str = "validation";
pub const GOLDEN: &str = "golden";
pub const ROBUSTNESS: &str = "robustness";
pub const INTEGRATION: &str = "integration";

/// One selectable test case
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuiteCase {
    /// Offline: a well-formed document passes validation
    HeaderPresent,
    /// Offline: a missing closing brace is reported as a brace problem
    UnbalancedBraces,
    /// Offline: empty content is rejected
    EmptyContent,
    FormatValidity { sample: String },
    ContentMatchesExpected { sample: String },
    NoCorruption { sample: String },
    ConsistentOutputFormat { sample: String, run: u32 },
    SpecialCharacters,
    FullPipeline { sample: String },
}

impl SuiteCase {
    pub fn class(&self) -> &'static str {
        match self {
            Self::HeaderPresent | Self::UnbalancedBraces | Self::EmptyContent => VALIDATION,
            Self::FormatValidity { .. }
            | Self::ContentMatchesExpected { .. }
            | Self::NoCorruption { .. } => GOLDEN,
            Self::ConsistentOutputFormat { .. } | Self::SpecialCharacters => ROBUSTNESS,
            Self::FullPipeline { .. } => INTEGRATION,
        }
    }

    /// Test name with its parameter, e.g. `format_validity[sample1]`
    pub fn name(&self) -> String {
        match self {
            Self::HeaderPresent => "header_present".to_string(),
            Self::UnbalancedBraces => "unbalanced_braces".to_string(),
            Self::EmptyContent => "empty_content".to_string(),
            Self::FormatValidity { sample } => format!("format_validity[{sample}]"),
            Self::ContentMatchesExpected { sample } => {
                format!("content_matches_expected[{sample}]")
            }
            Self::NoCorruption { sample } => format!("no_corruption[{sample}]"),
            Self::ConsistentOutputFormat { run, .. } => {
                format!("consistent_output_format[run-{run}]")
            }
            Self::SpecialCharacters => "special_characters".to_string(),
            Self::FullPipeline { sample } => format!("full_pipeline[{sample}]"),
        }
    }

    pub fn id(&self) -> String {
        format!("{}::{}", self.class(), self.name())
    }

    /// Whether the case calls the remote assistant
    pub fn is_remote(&self) -> bool {
        self.class() != VALIDATION
    }
}

/// All cases in execution order.
///
/// Golden cases run once per sample; robustness and integration cases use
/// the first sample. Without samples only the sample-free cases remain.
pub fn catalog(samples: &[String], robustness_runs: u32) -> Vec<SuiteCase> {
    let mut cases = vec![
        SuiteCase::HeaderPresent,
        SuiteCase::UnbalancedBraces,
        SuiteCase::EmptyContent,
    ];

    let golden: [fn(String) -> SuiteCase; 3] = [
        |sample| SuiteCase::FormatValidity { sample },
        |sample| SuiteCase::ContentMatchesExpected { sample },
        |sample| SuiteCase::NoCorruption { sample },
    ];
    for make in golden {
        cases.extend(samples.iter().cloned().map(make));
    }

    if let Some(first) = samples.first() {
        cases.extend((1..=robustness_runs).map(|run| SuiteCase::ConsistentOutputFormat {
            sample: first.clone(),
            run,
        }));
    }
    cases.push(SuiteCase::SpecialCharacters);

    if let Some(first) = samples.first() {
        cases.push(SuiteCase::FullPipeline {
            sample: first.clone(),
        });
    }
    cases
}

/// Substring filters on class and test name
#[derive(Clone, Debug, Default)]
pub struct CaseFilter {
    pub class: Option<String>,
    pub test: Option<String>,
}

impl CaseFilter {
    pub fn matches(&self, case: &SuiteCase) -> bool {
        let class_ok = self
            .class
            .as_deref()
            .is_none_or(|c| case.class().contains(c));
        let test_ok = self
            .test
            .as_deref()
            .is_none_or(|t| case.name().contains(t));
        class_ok && test_ok
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
