// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structural validation of RTF documents.
//!
//! Only gross structure is checked: a non-empty body, the `{\rtf` header,
//! balanced grouping braces, and a character-set declaration. Checks run in
//! that order and the first failure is the reported reason.

use serde::Serialize;
use thiserror::Error;

/// Canonical RTF opening marker.
pub const RTF_HEADER: &str = r"{\rtf";

/// Reason reported for a document that passes every check.
pub const VALID_RTF: &str = "Valid RTF";

/// Control words that declare a character set.
const CHARSET_MARKERS: [&str; 3] = [r"\ansi", r"\mac", r"\pc"];

/// Control words that end a paragraph or line.
const PARAGRAPH_MARKERS: [&str; 2] = [r"\par", r"\line"];

/// How the brace counter went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BraceImbalance {
    /// A `}` at this byte offset had no matching `{`.
    NegativeDip { offset: usize },
    /// Scan finished with this many unclosed (or surplus) groups.
    NonzeroTotal { balance: i64 },
}

impl std::fmt::Display for BraceImbalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BraceImbalance::NegativeDip { offset } => {
                write!(f, "closing brace at byte {} has no matching opener", offset)
            }
            BraceImbalance::NonzeroTotal { balance } => {
                write!(f, "difference of {} between opening and closing", balance)
            }
        }
    }
}

/// Structural failures, in the order they are checked.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RtfError {
    #[error("Empty content")]
    EmptyContent,

    #[error("Missing RTF header {{\\rtf")]
    MissingHeader,

    #[error("Unbalanced braces ({0})")]
    UnbalancedBraces(BraceImbalance),

    #[error("Missing character set declaration")]
    MissingCharsetMarker,
}

impl RtfError {
    /// Stable short name of the failure, used as the validation reason.
    pub fn kind(&self) -> &'static str {
        match self {
            RtfError::EmptyContent => "EmptyContent",
            RtfError::MissingHeader => "MissingHeader",
            RtfError::UnbalancedBraces(_) => "UnbalancedBraces",
            RtfError::MissingCharsetMarker => "MissingCharsetMarker",
        }
    }
}

/// Outcome of [`check`]: a flag plus the reason string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub is_valid: bool,
    pub reason: String,
}

impl Validation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: VALID_RTF.to_string(),
        }
    }
}

impl From<Result<(), RtfError>> for Validation {
    fn from(result: Result<(), RtfError>) -> Self {
        match result {
            Ok(()) => Validation::valid(),
            Err(e) => Validation {
                is_valid: false,
                reason: e.kind().to_string(),
            },
        }
    }
}

/// Validate a candidate RTF document.
///
/// Leading whitespace before the header is tolerated; everything else in
/// the content participates in the brace scan, including escaped braces.
pub fn validate(content: &str) -> Result<(), RtfError> {
    if content.trim().is_empty() {
        return Err(RtfError::EmptyContent);
    }

    if !content.trim_start().starts_with(RTF_HEADER) {
        return Err(RtfError::MissingHeader);
    }

    check_braces(content)?;

    if !CHARSET_MARKERS.iter().any(|m| content.contains(m)) {
        return Err(RtfError::MissingCharsetMarker);
    }

    Ok(())
}

/// Validate and flatten the result into `(is_valid, reason)` form.
pub fn check(content: &str) -> Validation {
    validate(content).into()
}

fn check_braces(content: &str) -> Result<(), RtfError> {
    let mut balance: i64 = 0;
    for (offset, byte) in content.bytes().enumerate() {
        match byte {
            b'{' => balance += 1,
            b'}' => balance -= 1,
            _ => continue,
        }
        if balance < 0 {
            return Err(RtfError::UnbalancedBraces(BraceImbalance::NegativeDip {
                offset,
            }));
        }
    }

    if balance != 0 {
        return Err(RtfError::UnbalancedBraces(BraceImbalance::NonzeroTotal {
            balance,
        }));
    }
    Ok(())
}

/// Corruption patterns that a structurally valid document can still show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Corruption {
    /// Neither `\par` nor `\line` appears.
    MissingParagraphMarkers,
    /// No `{\rtf` declaration anywhere in the content.
    MissingDeclaration,
    /// Non-whitespace text follows the brace that closes the document.
    TrailingContent { text: String },
}

impl std::fmt::Display for Corruption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Corruption::MissingParagraphMarkers => write!(f, "Missing paragraph markers"),
            Corruption::MissingDeclaration => write!(f, "Missing RTF declaration"),
            Corruption::TrailingContent { text } => {
                write!(f, "Content after closing brace: {:?}", text)
            }
        }
    }
}

/// Look for corruption patterns; an empty list means none were found.
pub fn check_corruption(content: &str) -> Vec<Corruption> {
    let mut found = Vec::new();

    if !PARAGRAPH_MARKERS.iter().any(|m| content.contains(m)) {
        found.push(Corruption::MissingParagraphMarkers);
    }
    if !content.contains(RTF_HEADER) {
        found.push(Corruption::MissingDeclaration);
    }
    if let Some(trailing) = trailing_content(content) {
        found.push(Corruption::TrailingContent {
            text: trailing.to_string(),
        });
    }

    found
}

/// Text after the brace that returns the counter to zero for the first time.
fn trailing_content(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let mut balance: i64 = 0;
    for (offset, byte) in content.bytes().enumerate().skip(start) {
        match byte {
            b'{' => balance += 1,
            b'}' => balance -= 1,
            _ => continue,
        }
        if balance == 0 {
            let rest = content[offset + 1..].trim();
            return (!rest.is_empty()).then_some(rest);
        }
    }
    None
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
