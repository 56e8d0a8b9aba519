// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Word-level diffs for similarity failures.

use crate::compare::normalize;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;

/// Inline word diff from `expected` to `actual`, over normalized text.
///
/// Removed words are shown as `[-word-]`, added words as `{+word+}`.
pub fn word_diff(actual: &str, expected: &str) -> String {
    let actual = normalize(actual);
    let expected = normalize(expected);
    let diff = TextDiff::from_words(expected.as_str(), actual.as_str());

    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let value = change.value();
        match change.tag() {
            ChangeTag::Equal => out.push_str(value),
            ChangeTag::Delete if value.trim().is_empty() => {}
            ChangeTag::Insert if value.trim().is_empty() => out.push_str(value),
            ChangeTag::Delete => {
                out.push_str("[-");
                out.push_str(value);
                out.push_str("-]");
            }
            ChangeTag::Insert => {
                out.push_str("{+");
                out.push_str(value);
                out.push_str("+}");
            }
        }
    }
    out
}

/// Expected words that never occur in `actual`, sorted.
pub fn missing_words(actual: &str, expected: &str) -> Vec<String> {
    let actual = normalize(actual);
    let present: BTreeSet<&str> = actual.split_whitespace().collect();
    normalize(expected)
        .split_whitespace()
        .filter(|w| !present.contains(w))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
