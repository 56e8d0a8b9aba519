// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structural checks and tolerant comparison for generated RTF documents.
//!
//! This crate holds the offline half of rtfcheck: a narrow structural
//! validator (header, brace balance, character set), a best-effort visible
//! text extractor, and a word-overlap similarity comparator used for golden
//! tests against reference fixtures.

pub mod compare;
pub mod diff;
pub mod extract;
pub mod validator;

pub use compare::{
    assert_similar, assert_similar_with, normalize, similarity, CompareError, Similarity,
    SimilarityStrategy, TokenOverlap, DEFAULT_TOLERANCE,
};
pub use diff::{missing_words, word_diff};
pub use extract::extract_visible_text;
pub use validator::{
    check, check_corruption, validate, BraceImbalance, Corruption, RtfError, Validation,
    RTF_HEADER, VALID_RTF,
};
