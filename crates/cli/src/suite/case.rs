// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-case progress tracking and failure diagnostics.

use rtf_check::{CompareError, Corruption, RtfError};
use rtfcheck_capture::{CaseOutcome, Stage};

use crate::client::ClientError;
use crate::fixtures::FixtureError;

/// Why a single case failed
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid RTF output: {0}")]
    InvalidRtf(#[from] RtfError),

    #[error("{error}{}", missing_suffix(.missing))]
    Similarity {
        error: CompareError,
        /// Expected words absent from the output
        missing: Vec<String>,
    },

    #[error("RTF corruption detected: {}", join(.0))]
    Corruption(Vec<Corruption>),

    #[error("{0}")]
    Assertion(String),
}

fn missing_suffix(missing: &[String]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!("; missing: {}", missing.join(" "))
    }
}

fn join(found: &[Corruption]) -> String {
    found
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CaseError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_auth())
    }
}

/// Stage tracker for one executing case.
///
/// Stages only move forward; a failure records the last stage reached.
#[derive(Debug)]
pub struct CaseRun {
    stage: Stage,
}

impl Default for CaseRun {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseRun {
    pub fn new() -> Self {
        Self {
            stage: Stage::Loaded,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move to `stage`; earlier stages are ignored.
    pub fn reach(&mut self, stage: Stage) {
        if stage > self.stage {
            tracing::trace!(from = %self.stage, to = %stage, "case stage");
            self.stage = stage;
        }
    }

    pub fn finish(mut self) -> CaseOutcome {
        self.reach(Stage::Reported);
        CaseOutcome::Passed
    }

    pub fn fail(self, reason: impl Into<String>) -> CaseOutcome {
        CaseOutcome::failed(self.stage, reason)
    }
}

#[cfg(test)]
#[path = "case_tests.rs"]
mod tests;
