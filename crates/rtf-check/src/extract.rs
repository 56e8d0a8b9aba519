// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Visible text extraction.
//!
//! A single pass over the document that drops control words, grouping
//! braces and the bodies of non-text destinations, keeping only what a
//! reader would see. The scan never fails: unbalanced or truncated input
//! produces whatever text could be recovered, since this also runs on
//! documents that already failed validation.

use encoding_rs::{Encoding, WINDOWS_1252};

/// Destinations whose group body is metadata rather than document text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "latentstyles",
    "themedata",
    "datastore",
    "xmlnstbl",
    "generator",
];

/// Extract human-readable text from RTF, collapsing whitespace.
pub fn extract_visible_text(content: &str) -> String {
    let mut scanner = Scanner::default();
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => scanner.open_group(),
            '}' => scanner.close_group(),
            '\\' => match chars.peek().copied() {
                None => break,
                Some(next) if next.is_ascii_alphabetic() => {
                    let mut word = String::new();
                    while let Some(&l) = chars.peek() {
                        if !l.is_ascii_alphabetic() {
                            break;
                        }
                        word.push(l);
                        chars.next();
                    }
                    let mut param = String::new();
                    if chars.peek() == Some(&'-') {
                        param.push('-');
                        chars.next();
                    }
                    while let Some(&d) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        param.push(d);
                        chars.next();
                    }
                    // A single space delimits the control word and is not text.
                    if chars.peek() == Some(&' ') {
                        chars.next();
                    }
                    scanner.control_word(&word, param.parse::<i32>().ok());
                }
                Some('\'') => {
                    chars.next();
                    let hi = chars.next_if(char::is_ascii_hexdigit);
                    let lo = chars.next_if(char::is_ascii_hexdigit);
                    if let (Some(hi), Some(lo)) = (hi, lo) {
                        let byte = hex_value(hi) * 16 + hex_value(lo);
                        scanner.text_char(decode_byte(scanner.encoding, byte));
                    }
                }
                Some('*') => {
                    chars.next();
                    scanner.ignorable_destination();
                }
                Some(sym @ ('{' | '}' | '\\')) => {
                    chars.next();
                    scanner.text_char(sym);
                }
                Some('~') => {
                    chars.next();
                    scanner.text_char(' ');
                }
                Some('_') => {
                    chars.next();
                    scanner.text_char('-');
                }
                Some('\n' | '\r') => {
                    chars.next();
                    scanner.break_text();
                }
                Some(_) => {
                    chars.next();
                    scanner.group_start = false;
                }
            },
            '\r' | '\n' => scanner.break_text(),
            other => scanner.text_char(other),
        }
    }

    scanner.out.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Scanner {
    out: String,
    /// Code page for `\'hh` escapes.
    encoding: &'static Encoding,
    /// Skip state of each enclosing group.
    stack: Vec<bool>,
    skipping: bool,
    /// The previous token opened a group.
    group_start: bool,
    /// Fallback characters still to drop after a `\uN`.
    unicode_fallback: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            out: String::new(),
            encoding: WINDOWS_1252,
            stack: Vec::new(),
            skipping: false,
            group_start: false,
            unicode_fallback: 0,
        }
    }
}

impl Scanner {
    fn open_group(&mut self) {
        self.stack.push(self.skipping);
        self.group_start = true;
        self.out.push(' ');
    }

    fn close_group(&mut self) {
        self.skipping = self.stack.pop().unwrap_or(false);
        self.group_start = false;
        self.unicode_fallback = 0;
        self.out.push(' ');
    }

    fn ignorable_destination(&mut self) {
        if self.group_start {
            self.skipping = true;
        }
    }

    fn break_text(&mut self) {
        self.out.push(' ');
    }

    fn text_char(&mut self, c: char) {
        self.group_start = false;
        if self.skipping {
            return;
        }
        if self.unicode_fallback > 0 {
            self.unicode_fallback -= 1;
            return;
        }
        self.out.push(c);
    }

    fn control_word(&mut self, word: &str, param: Option<i32>) {
        let at_group_start = std::mem::take(&mut self.group_start);
        if at_group_start && SKIPPED_DESTINATIONS.contains(&word) {
            self.skipping = true;
        }
        if self.skipping {
            return;
        }

        let replacement = match word {
            "ansicpg" => {
                if let Some(encoding) = param.and_then(ansi_codepage) {
                    self.encoding = encoding;
                }
                return;
            }
            "par" | "line" | "sect" | "page" | "row" | "cell" | "tab" => ' ',
            "emdash" => '\u{2014}',
            "endash" => '\u{2013}',
            "lquote" => '\u{2018}',
            "rquote" => '\u{2019}',
            "ldblquote" => '\u{201C}',
            "rdblquote" => '\u{201D}',
            "bullet" => '\u{2022}',
            "u" => {
                let Some(code) = param else { return };
                // Values above 32767 are written as negative 16-bit integers.
                let code = if code < 0 { code + 65536 } else { code };
                let decoded = u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or('\u{FFFD}');
                self.out.push(decoded);
                self.unicode_fallback = 1;
                return;
            }
            _ => return,
        };
        self.out.push(replacement);
    }
}

fn hex_value(c: char) -> u8 {
    c.to_digit(16).map(|d| d as u8).unwrap_or(0)
}

/// Encoding named by `\ansicpg`, for the single-byte Windows code pages.
///
/// Multi-byte code pages would need `\'hh` pairs joined before decoding, so
/// they keep the default.
fn ansi_codepage(codepage: i32) -> Option<&'static Encoding> {
    match codepage {
        874 | 1250..=1258 => Encoding::for_label(format!("windows-{codepage}").as_bytes()),
        _ => None,
    }
}

fn decode_byte(encoding: &'static Encoding, byte: u8) -> char {
    let bytes = [byte];
    let (decoded, _) = encoding.decode_without_bom_handling(&bytes);
    decoded.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
