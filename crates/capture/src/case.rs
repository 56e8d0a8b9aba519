// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded test case data types.

use super::duration_ms;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Stage a test case has reached.
///
/// Cases move `Loaded -> Invoked -> Validated -> Compared -> Reported`.
/// Offline cases skip `Invoked`, format checks skip `Compared` and content
/// checks go straight from `Invoked` to `Compared`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Loaded,
    Invoked,
    Validated,
    Compared,
    Reported,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Loaded => "loaded",
            Stage::Invoked => "invoked",
            Stage::Validated => "validated",
            Stage::Compared => "compared",
            Stage::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Final outcome of a test case
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    /// Failed while in `stage`; the stage is the last one fully reached.
    Failed {
        stage: Stage,
        reason: String,
    },
    Skipped {
        reason: String,
    },
}

impl CaseOutcome {
    pub fn failed(stage: Stage, reason: impl Into<String>) -> Self {
        CaseOutcome::Failed {
            stage,
            reason: reason.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        CaseOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CaseOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CaseOutcome::Skipped { .. })
    }

    /// Lowercase status word
    pub fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "passed",
            CaseOutcome::Failed { .. } => "failed",
            CaseOutcome::Skipped { .. } => "skipped",
        }
    }

    /// Failure or skip reason, if any
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            CaseOutcome::Passed => None,
            CaseOutcome::Failed { reason, .. } | CaseOutcome::Skipped { reason } => {
                Some(reason)
            }
        }
    }
}

/// One executed test case
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapturedCase {
    /// Sequence number within the run
    pub seq: u64,

    /// Wall-clock time the case finished
    pub timestamp: SystemTime,

    /// Time since the run started
    #[serde(rename = "elapsed_ms", with = "duration_ms")]
    pub elapsed: Duration,

    /// Test class, e.g. `golden`
    pub class: String,

    /// Test name including parameters, e.g. `format_validity[sample1]`
    pub name: String,

    pub outcome: CaseOutcome,

    /// Time spent in the case itself
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
}

impl CapturedCase {
    /// `class::name` identifier
    pub fn id(&self) -> String {
        format!("{}::{}", self.class, self.name)
    }
}

#[cfg(test)]
#[path = "case_tests.rs"]
mod tests;
