// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test case result recording.
//!
//! Each case executed by an rtfcheck run is recorded once, in order, with
//! its outcome and timing. The log can stream JSONL to disk so the report
//! generator can be run separately after the suite.

mod case;
mod duration_ms;
mod log;

pub use case::{CapturedCase, CaseOutcome, Stage};
pub use log::ResultLog;
