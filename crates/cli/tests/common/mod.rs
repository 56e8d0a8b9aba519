// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

//! Shared helpers for binary tests.
//!
//! Each test gets a scratch working directory laid out like a project
//! checkout: `tests/fixtures/{input,expected}` plus room for `.env` and
//! `rtfcheck.toml`.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SAMPLE_PROMPT: &str = "Convertir en RTF: Rapport mensuel. Objectifs atteints.";

pub const SAMPLE_EXPECTED: &str = r"{\rtf1\ansi\ansicpg1252\deff0
{\fonttbl{\f0\fnil\fcharset0 Calibri;}}
\b Rapport mensuel\b0\par
Objectifs atteints.\par
}";

/// Variables that would leak a developer's setup into the test
const ISOLATED_VARS: [&str; 9] = [
    "OPENAI_API_KEY",
    "OPENAI_ASSISTANT_ID",
    "OPENAI_MODEL_ID",
    "OPENAI_BASE_URL",
    "RTFCHECK_CONFIG",
    "RTFCHECK_TIMEOUT_SECS",
    "RTFCHECK_POLL_INTERVAL_MS",
    "RTFCHECK_FIXTURES_DIR",
    "RTFCHECK_OUTPUT_DIR",
];

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Scratch directory with one sample fixture
    pub fn new() -> Self {
        let ws = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        ws.write("tests/fixtures/input/sample1.txt", SAMPLE_PROMPT);
        ws.write(
            "tests/fixtures/expected/sample1_expected.rtf",
            SAMPLE_EXPECTED,
        );
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file relative to the workspace, creating parents
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.join(relative)).unwrap()
    }

    /// `rtfcheck` running inside the workspace with a clean environment
    pub fn rtfcheck(&self) -> Command {
        let mut cmd = Command::cargo_bin("rtfcheck").unwrap();
        cmd.current_dir(self.path());
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.env_remove("RUST_LOG");
        cmd
    }
}
