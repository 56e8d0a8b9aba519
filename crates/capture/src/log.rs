// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Result log implementation.

use crate::case::{CapturedCase, CaseOutcome};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

/// Ordered log of executed test cases
pub struct ResultLog {
    start: Instant,
    cases: Arc<Mutex<Vec<CapturedCase>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
    path: Option<PathBuf>,
}

impl ResultLog {
    /// Create a new in-memory result log
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            cases: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
            path: None,
        }
    }

    /// Create a result log that also writes each case to a JSONL file
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            cases: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
            path: Some(path.to_path_buf()),
        })
    }

    /// JSONL file the log streams to, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read cases back from a JSONL file written by [`ResultLog::with_file`].
    ///
    /// Blank lines are skipped; a malformed line is an `InvalidData` error.
    pub fn load(path: &Path) -> std::io::Result<Vec<CapturedCase>> {
        let reader = BufReader::new(File::open(path)?);
        let mut cases = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let case: CapturedCase = serde_json::from_str(&line)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            cases.push(case);
        }
        Ok(cases)
    }

    /// Record a finished case.
    ///
    /// The case is kept in memory even when appending it to the JSONL file
    /// fails; the write error is returned.
    pub fn record(
        &self,
        class: impl Into<String>,
        name: impl Into<String>,
        outcome: CaseOutcome,
        duration: Duration,
    ) -> std::io::Result<CapturedCase> {
        let mut cases = self.cases.lock();
        let case = CapturedCase {
            seq: cases.len() as u64,
            timestamp: SystemTime::now(),
            elapsed: self.start.elapsed(),
            class: class.into(),
            name: name.into(),
            outcome,
            duration,
        };

        cases.push(case.clone());

        if let Some(ref writer) = self.file_writer {
            let json = serde_json::to_string(&case)?;
            let mut w = writer.lock();
            writeln!(w, "{}", json)?;
            w.flush()?;
        }

        Ok(case)
    }

    /// Get all recorded cases
    pub fn cases(&self) -> Vec<CapturedCase> {
        self.cases.lock().clone()
    }

    /// Count cases matching a predicate
    pub fn count<F: Fn(&CapturedCase) -> bool>(&self, pred: F) -> usize {
        self.cases.lock().iter().filter(|c| pred(c)).count()
    }

    /// Cases that failed
    pub fn failures(&self) -> Vec<CapturedCase> {
        self.cases
            .lock()
            .iter()
            .filter(|c| c.outcome.is_failed())
            .cloned()
            .collect()
    }

    /// Cases of one class, in execution order
    pub fn by_class(&self, class: &str) -> Vec<CapturedCase> {
        self.cases
            .lock()
            .iter()
            .filter(|c| c.class == class)
            .cloned()
            .collect()
    }

    /// Whether any recorded case failed
    pub fn has_failures(&self) -> bool {
        self.cases.lock().iter().any(|c| c.outcome.is_failed())
    }

    /// Get the total number of recorded cases
    pub fn len(&self) -> usize {
        self.cases.lock().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.cases.lock().is_empty()
    }
}

impl Default for ResultLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ResultLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            cases: Arc::clone(&self.cases),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
            path: self.path.clone(),
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
