// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    lowercases = { "Hello WORLD", "hello world" },
    collapses_whitespace = { "a \t\n  b", "a b" },
    trims = { "  padded  ", "padded" },
    em_dash = { "a\u{2014}b", "a-b" },
    en_dash = { "1\u{2013}2", "1-2" },
    curly_double = { "\u{201C}quoted\u{201D}", "\"quoted\"" },
    curly_single = { "it\u{2019}s \u{2018}x\u{2019}", "it's 'x'" },
    empty = { "", "" },
)]
fn normalize_cases(input: &str, expected: &str) {
    assert_eq!(normalize(input), expected);
}

#[test]
fn test_similarity_identical() {
    assert_eq!(similarity("Rapport Mensuel", "Rapport Mensuel"), 1.0);
}

#[test]
fn test_similarity_degenerate_cases() {
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("abc", ""), 0.0);
    assert_eq!(similarity("", "abc"), 0.0);
    assert_eq!(similarity("   ", "\n"), 1.0);
}

#[test]
fn test_similarity_ignores_order_and_duplicates() {
    assert_eq!(similarity("b a a a", "a b"), 1.0);
    assert_eq!(similarity("a", "a a b b"), 0.5);
}

#[test]
fn test_similarity_is_relative_to_expected() {
    // Extra words in the actual text do not lower the score.
    assert_eq!(similarity("one two three four", "one two"), 1.0);
}

#[test]
fn test_accented_text_below_tolerance() {
    let err = assert_similar("Café costs £5", "Cafe costs 5 pounds", DEFAULT_TOLERANCE)
        .unwrap_err();
    let CompareError::SimilarityTooLow {
        ratio,
        tolerance,
        matched,
        expected,
    } = err.clone();
    assert_eq!(ratio, 0.25);
    assert_eq!(tolerance, 0.85);
    assert_eq!(matched, 1);
    assert_eq!(expected, 4);
    assert_eq!(
        err.to_string(),
        "Text similarity too low: 25.00% (expected >= 85%), matched 1 of 4 words"
    );
}

#[test]
fn test_assert_similar_passes_silently() {
    let score = assert_similar("the quick brown fox", "quick fox", DEFAULT_TOLERANCE).unwrap();
    assert_eq!(score.matched, 2);
    assert_eq!(score.expected, 2);
}

#[test]
fn test_tolerance_is_overridable() {
    // 4 of 5 words: fails at 0.85, passes at 0.80.
    let expected = "one two three four five";
    let actual = "one two three four";
    assert!(assert_similar(actual, expected, 0.85).is_err());
    assert!(assert_similar(actual, expected, 0.80).is_ok());
}

#[test]
fn test_typographic_variants_match() {
    let actual = "\u{201C}Rapport\u{201D} \u{2014} Novembre";
    let expected = "\"rapport\" - novembre";
    assert_eq!(similarity(actual, expected), 1.0);
}

struct AlwaysHalf;

impl SimilarityStrategy for AlwaysHalf {
    fn score(&self, _actual: &str, _expected: &str) -> Similarity {
        Similarity {
            ratio: 0.5,
            matched: 1,
            expected: 2,
        }
    }
}

#[test]
fn test_custom_strategy_is_pluggable() {
    assert!(assert_similar_with(&AlwaysHalf, "x", "x", 0.6).is_err());
    assert!(assert_similar_with(&AlwaysHalf, "x", "y", 0.5).is_ok());
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in "\\PC{0,80}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn similarity_is_reflexive(s in "[a-zA-Z\u{e9}\u{2014} ]{0,60}[a-z]") {
        prop_assert_eq!(similarity(&s, &s), 1.0);
    }

    #[test]
    fn similarity_is_a_ratio(a in "\\PC{0,60}", b in "\\PC{0,60}") {
        let r = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&r));
    }
}
