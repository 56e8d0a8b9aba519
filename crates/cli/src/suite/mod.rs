// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Conformance suite: catalog, per-case stages and the sequential runner.

mod case;
pub mod catalog;
mod runner;

pub use case::{CaseError, CaseRun};
pub use catalog::{catalog, CaseFilter, SuiteCase};
pub use runner::{RunOptions, SuiteRunner, SuiteSummary, RESULTS_FILE};

use std::path::PathBuf;

use crate::fixtures::FixtureError;

/// Errors that stop the whole suite rather than a single case
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No test cases match the given filters")]
    NoCases,
}
