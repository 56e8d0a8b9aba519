// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tolerant text comparison for golden tests.
//!
//! Texts are normalized (case, whitespace, typographic look-alikes) and then
//! scored by the share of expected words that also occur in the actual text.
//! Word order and frequency are ignored.

use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Minimum similarity accepted when a test does not override it.
pub const DEFAULT_TOLERANCE: f64 = 0.85;

/// Typographic characters and their ASCII stand-ins.
const LOOKALIKES: [(char, char); 6] = [
    ('\u{2014}', '-'),
    ('\u{2013}', '-'),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
];

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CompareError {
    #[error(
        "Text similarity too low: {:.2}% (expected >= {:.0}%), matched {matched} of {expected} words",
        .ratio * 100.0,
        .tolerance * 100.0
    )]
    SimilarityTooLow {
        ratio: f64,
        tolerance: f64,
        matched: usize,
        expected: usize,
    },
}

/// Similarity score with the counts it was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Similarity {
    pub ratio: f64,
    pub matched: usize,
    pub expected: usize,
}

/// A way of scoring how much of `expected` is present in `actual`.
pub trait SimilarityStrategy {
    fn score(&self, actual: &str, expected: &str) -> Similarity;
}

/// Word-set overlap over normalized text.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenOverlap;

impl SimilarityStrategy for TokenOverlap {
    fn score(&self, actual: &str, expected: &str) -> Similarity {
        let actual = normalize(actual);
        let expected = normalize(expected);
        let actual_words: BTreeSet<&str> = actual.split_whitespace().collect();
        let expected_words: BTreeSet<&str> = expected.split_whitespace().collect();

        if expected_words.is_empty() {
            return Similarity {
                ratio: if actual_words.is_empty() { 1.0 } else { 0.0 },
                matched: 0,
                expected: 0,
            };
        }

        let matched = actual_words.intersection(&expected_words).count();
        Similarity {
            ratio: matched as f64 / expected_words.len() as f64,
            matched,
            expected: expected_words.len(),
        }
    }
}

/// Canonical form used for comparison.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| {
            LOOKALIKES
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect();
    let lowered = mapped.to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Share of expected words present in `actual`, in `[0, 1]`.
pub fn similarity(actual: &str, expected: &str) -> f64 {
    TokenOverlap.score(actual, expected).ratio
}

/// Fail with [`CompareError::SimilarityTooLow`] below `tolerance`.
pub fn assert_similar(
    actual: &str,
    expected: &str,
    tolerance: f64,
) -> Result<Similarity, CompareError> {
    assert_similar_with(&TokenOverlap, actual, expected, tolerance)
}

/// [`assert_similar`] with an explicit scoring strategy.
pub fn assert_similar_with<S: SimilarityStrategy + ?Sized>(
    strategy: &S,
    actual: &str,
    expected: &str,
    tolerance: f64,
) -> Result<Similarity, CompareError> {
    let score = strategy.score(actual, expected);
    if score.ratio < tolerance {
        return Err(CompareError::SimilarityTooLow {
            ratio: score.ratio,
            tolerance,
            matched: score.matched,
            expected: score.expected,
        });
    }
    Ok(score)
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
