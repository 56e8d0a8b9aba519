// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JUnit XML export and import.
//!
//! Export writes one `<testsuite>` with a `<testcase>` per entry. Import
//! accepts any JUnit-style file (including pytest's `--junit-xml`):
//! `<failure>` and `<error>` children mark a case failed, `<skipped>` marks
//! it skipped.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use std::time::Duration;

use rtfcheck_capture::{CaseOutcome, Stage};

use super::{ReportEntry, ReportError};

/// Counts declared by `<testsuite>` elements, summed
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JunitTotals {
    pub tests: usize,
    pub failures: usize,
    pub errors: usize,
    pub skipped: usize,
    /// Seconds
    pub time: f64,
}

impl JunitTotals {
    fn add(&mut self, other: &JunitTotals) {
        self.tests += other.tests;
        self.failures += other.failures;
        self.errors += other.errors;
        self.skipped += other.skipped;
        self.time += other.time;
    }

    fn from_entries(entries: &[ReportEntry]) -> Self {
        let mut totals = Self {
            tests: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            match entry.outcome {
                CaseOutcome::Passed => {}
                CaseOutcome::Failed { .. } => totals.failures += 1,
                CaseOutcome::Skipped { .. } => totals.skipped += 1,
            }
            totals.time += entry.duration.as_secs_f64();
        }
        totals
    }
}

/// Parsed JUnit file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JunitReport {
    pub entries: Vec<ReportEntry>,
    pub totals: JunitTotals,
}

/// Render entries as a JUnit XML document
pub fn to_xml(suite_name: &str, entries: &[ReportEntry]) -> String {
    let totals = JunitTotals::from_entries(entries);
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuites>\n");
    xml.push_str(&format!(
        "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
        escape(suite_name),
        totals.tests,
        totals.failures,
        totals.skipped,
        totals.time
    ));

    for entry in entries {
        let open = format!(
            "    <testcase classname=\"{}\" name=\"{}\" time=\"{:.3}\"",
            escape(&entry.class),
            escape(&entry.name),
            entry.duration.as_secs_f64()
        );
        match &entry.outcome {
            CaseOutcome::Passed => {
                xml.push_str(&open);
                xml.push_str("/>\n");
            }
            CaseOutcome::Failed { stage, reason } => {
                xml.push_str(&open);
                xml.push_str(">\n");
                xml.push_str(&format!(
                    "      <failure message=\"{}\" type=\"{}\">{}</failure>\n",
                    escape(first_line(reason)),
                    stage,
                    escape(reason)
                ));
                xml.push_str("    </testcase>\n");
            }
            CaseOutcome::Skipped { reason } => {
                xml.push_str(&open);
                xml.push_str(">\n");
                xml.push_str(&format!(
                    "      <skipped message=\"{}\"/>\n",
                    escape(reason)
                ));
                xml.push_str("    </testcase>\n");
            }
        }
    }

    xml.push_str("  </testsuite>\n</testsuites>\n");
    xml
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// Parse a JUnit XML document
pub fn parse(xml: &str) -> Result<JunitReport, ReportError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut parser = Parser::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.open(&e, false)?,
            Ok(Event::Empty(e)) => parser.open(&e, true)?,
            Ok(Event::End(e)) => parser.close(e.name().as_ref()),
            Ok(Event::Text(t)) => parser.text(&t.unescape().map_err(xml_error)?),
            Ok(Event::CData(t)) => parser.text(&String::from_utf8_lossy(&t)),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ReportError::Xml(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(parser.finish())
}

/// Write entries to a JUnit XML file
pub fn write_file(path: &Path, suite_name: &str, entries: &[ReportEntry]) -> Result<(), ReportError> {
    std::fs::write(path, to_xml(suite_name, entries)).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a JUnit XML file
pub fn read_file(path: &Path) -> Result<JunitReport, ReportError> {
    let xml = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&xml)
}

fn xml_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::Xml(e.to_string())
}

#[derive(Default)]
struct Parser {
    entries: Vec<ReportEntry>,
    totals: JunitTotals,
    saw_suite: bool,
    case: Option<ReportEntry>,
    capture_text: bool,
}

impl Parser {
    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), ReportError> {
        match e.name().as_ref() {
            b"testsuite" => {
                self.saw_suite = true;
                let suite = JunitTotals {
                    tests: number(e, b"tests")?,
                    failures: number(e, b"failures")?,
                    errors: number(e, b"errors")?,
                    skipped: number(e, b"skipped")?,
                    time: seconds(e)?,
                };
                self.totals.add(&suite);
            }
            b"testcase" => {
                self.case = Some(ReportEntry {
                    class: attr(e, b"classname")?.unwrap_or_default(),
                    name: attr(e, b"name")?.unwrap_or_default(),
                    outcome: CaseOutcome::Passed,
                    duration: Duration::try_from_secs_f64(seconds(e)?).unwrap_or_default(),
                });
                if empty {
                    self.close(b"testcase");
                }
            }
            tag @ (b"failure" | b"error" | b"skipped") => {
                let message = attr(e, b"message")?.unwrap_or_default();
                let stage = attr(e, b"type")?
                    .and_then(|t| parse_stage(&t))
                    .unwrap_or(Stage::Loaded);
                if let Some(case) = self.case.as_mut() {
                    self.capture_text = !empty && message.is_empty();
                    case.outcome = if tag == b"skipped" {
                        CaseOutcome::skipped(message)
                    } else {
                        CaseOutcome::failed(stage, message)
                    };
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"testcase" => {
                if let Some(case) = self.case.take() {
                    self.entries.push(case);
                }
            }
            b"failure" | b"error" | b"skipped" => self.capture_text = false,
            _ => {}
        }
    }

    /// Element text stands in for a missing `message` attribute.
    fn text(&mut self, text: &str) {
        if !self.capture_text {
            return;
        }
        if let Some(case) = self.case.as_mut() {
            if let CaseOutcome::Failed { reason, .. } | CaseOutcome::Skipped { reason } =
                &mut case.outcome
            {
                if !reason.is_empty() {
                    reason.push(' ');
                }
                reason.push_str(text.trim());
            }
        }
    }

    fn finish(self) -> JunitReport {
        let totals = if self.saw_suite {
            self.totals
        } else {
            JunitTotals::from_entries(&self.entries)
        };
        JunitReport {
            entries: self.entries,
            totals,
        }
    }
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ReportError> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        if attribute.key.as_ref() == name {
            let value = attribute.unescape_value().map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn number(e: &BytesStart<'_>, name: &[u8]) -> Result<usize, ReportError> {
    Ok(attr(e, name)?
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0))
}

fn seconds(e: &BytesStart<'_>) -> Result<f64, ReportError> {
    Ok(attr(e, b"time")?
        .and_then(|v| v.trim().replace(',', "").parse::<f64>().ok())
        .filter(|t| t.is_finite() && *t >= 0.0)
        .unwrap_or(0.0))
}

fn parse_stage(name: &str) -> Option<Stage> {
    match name {
        "loaded" => Some(Stage::Loaded),
        "invoked" => Some(Stage::Invoked),
        "validated" => Some(Stage::Validated),
        "compared" => Some(Stage::Compared),
        "reported" => Some(Stage::Reported),
        _ => None,
    }
}

#[cfg(test)]
#[path = "junit_tests.rs"]
mod tests;
