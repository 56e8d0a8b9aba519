// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::case::Stage;
use proptest::prelude::*;
use rstest::rstest;
use std::thread;

fn failed(reason: &str) -> CaseOutcome {
    CaseOutcome::failed(Stage::Validated, reason)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_record_and_retrieve() {
    let log = ResultLog::new();

    let case = log.record("golden", "format_validity[sample1]", CaseOutcome::Passed, ms(12))
        .unwrap();

    assert_eq!(case.seq, 0);
    assert_eq!(log.len(), 1);
    let cases = log.cases();
    assert_eq!(cases[0].id(), "golden::format_validity[sample1]");
    assert_eq!(cases[0].duration, ms(12));
}

#[test]
fn test_count_by_outcome() {
    let log = ResultLog::new();

    log.record("validation", "header_present", CaseOutcome::Passed, ms(0)).unwrap();
    log.record("golden", "format_validity[s1]", failed("Invalid RTF output: UnbalancedBraces"), ms(5))
        .unwrap();
    log.record("golden", "no_corruption[s1]", CaseOutcome::skipped("auth"), ms(0)).unwrap();

    assert_eq!(log.count(|c| c.outcome.is_passed()), 1);
    assert_eq!(log.count(|c| c.outcome.is_failed()), 1);
    assert_eq!(log.count(|c| c.outcome.is_skipped()), 1);
    assert!(log.has_failures());
    assert_eq!(log.failures()[0].name, "format_validity[s1]");
}

#[rstest]
#[case("golden", 2)]
#[case("robustness", 1)]
#[case("integration", 0)]
fn test_by_class(#[case] class: &str, #[case] expected: usize) {
    let log = ResultLog::new();
    log.record("golden", "a", CaseOutcome::Passed, ms(1)).unwrap();
    log.record("robustness", "b", CaseOutcome::Passed, ms(1)).unwrap();
    log.record("golden", "c", CaseOutcome::Passed, ms(1)).unwrap();

    assert_eq!(log.by_class(class).len(), expected);
}

#[test]
fn test_no_failures_when_all_pass() {
    let log = ResultLog::new();
    log.record("validation", "empty_content", CaseOutcome::Passed, ms(0)).unwrap();
    assert!(!log.has_failures());
}

#[test]
fn test_default() {
    let log = ResultLog::default();
    assert!(log.is_empty());
}

#[test]
fn test_clone_shares_state() {
    let log1 = ResultLog::new();
    let log2 = log1.clone();

    log1.record("golden", "from log1", CaseOutcome::Passed, ms(1)).unwrap();
    assert_eq!(log2.len(), 1);

    log2.record("golden", "from log2", CaseOutcome::Passed, ms(1)).unwrap();
    assert_eq!(log1.len(), 2);
}

#[test]
fn test_file_roundtrip_through_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.jsonl");

    {
        let log = ResultLog::with_file(&path).unwrap();
        log.record("golden", "format_validity[sample1]", CaseOutcome::Passed, ms(1500)).unwrap();
        log.record(
            "golden",
            "content_matches_expected[sample1]",
            CaseOutcome::failed(Stage::Validated, "Text similarity too low"),
            ms(2100),
        )
        .unwrap();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("\"duration_ms\":1500"));
    assert!(content.contains("\"status\":\"failed\""));

    let cases = ResultLog::load(&path).unwrap();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[1].seq, 1);
    assert_eq!(
        cases[1].outcome,
        CaseOutcome::failed(Stage::Validated, "Text similarity too low")
    );
    assert_eq!(cases[1].duration, ms(2100));
}

#[cfg(target_os = "linux")]
#[test]
fn test_write_failure_is_returned_and_case_kept() {
    let log = ResultLog::with_file(Path::new("/dev/full")).unwrap();
    assert_eq!(log.path(), Some(Path::new("/dev/full")));

    let err = log
        .record("validation", "header_present", CaseOutcome::Passed, ms(0))
        .unwrap_err();

    // ENOSPC
    assert_eq!(err.raw_os_error(), Some(28));
    assert_eq!(log.len(), 1);
}

#[test]
fn test_in_memory_log_has_no_path() {
    assert!(ResultLog::new().path().is_none());
}

#[test]
fn test_load_skips_blank_lines_and_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.jsonl");

    std::fs::write(&path, "\n\n").unwrap();
    assert!(ResultLog::load(&path).unwrap().is_empty());

    std::fs::write(&path, "not json\n").unwrap();
    let err = ResultLog::load(&path).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn test_file_capture_invalid_path() {
    let result = ResultLog::with_file(std::path::Path::new("/nonexistent/dir/results.jsonl"));
    assert!(result.is_err());
}

#[test]
fn test_thread_safety() {
    let log = ResultLog::new();
    let log_clone = log.clone();

    let handle = thread::spawn(move || {
        for i in 0..100 {
            log_clone.record("t", format!("thread-{}", i), CaseOutcome::Passed, ms(0)).unwrap();
        }
    });

    for i in 0..100 {
        log.record("t", format!("main-{}", i), CaseOutcome::Passed, ms(0)).unwrap();
    }

    handle.join().unwrap();
    assert_eq!(log.len(), 200);
}

proptest! {
    #[test]
    fn sequence_numbers_are_dense(count in 0usize..50) {
        let log = ResultLog::new();
        for i in 0..count {
            log.record("p", format!("case-{}", i), CaseOutcome::Passed, ms(0)).unwrap();
        }
        for (i, case) in log.cases().iter().enumerate() {
            prop_assert_eq!(case.seq, i as u64);
        }
    }
}
