// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables read by rtfcheck are defined here,
//! together with the `.env` file loader used for credentials.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

use std::path::{Path, PathBuf};

/// `OPENAI_API_KEY`: Bearer credential for the OpenAI API.
pub fn api_key() -> Option<String> {
    var_non_empty(names::OPENAI_API_KEY)
}

/// `OPENAI_ASSISTANT_ID`: Assistant used in assistants mode.
pub fn assistant_id() -> Option<String> {
    var_non_empty(names::OPENAI_ASSISTANT_ID)
}

/// `OPENAI_MODEL_ID`: Model identifier for chat mode and assistant creation.
pub fn model_id() -> Option<String> {
    var_non_empty(names::OPENAI_MODEL_ID)
}

/// `OPENAI_BASE_URL`: API base URL override.
pub fn base_url() -> Option<String> {
    var_non_empty(names::OPENAI_BASE_URL)
}

/// `RTFCHECK_CONFIG`: Path to the harness TOML file.
pub fn config_path() -> Option<PathBuf> {
    var_non_empty(names::RTFCHECK_CONFIG).map(PathBuf::from)
}

/// `RTFCHECK_TIMEOUT_SECS`: Per-generation timeout.
pub fn timeout_secs() -> Option<u64> {
    var_u64(names::RTFCHECK_TIMEOUT_SECS)
}

/// `RTFCHECK_POLL_INTERVAL_MS`: Run status poll interval.
pub fn poll_interval_ms() -> Option<u64> {
    var_u64(names::RTFCHECK_POLL_INTERVAL_MS)
}

/// `RTFCHECK_FIXTURES_DIR`: Fixture root override.
pub fn fixtures_dir() -> Option<PathBuf> {
    var_non_empty(names::RTFCHECK_FIXTURES_DIR).map(PathBuf::from)
}

/// `RTFCHECK_OUTPUT_DIR`: Output directory override.
pub fn output_dir() -> Option<PathBuf> {
    var_non_empty(names::RTFCHECK_OUTPUT_DIR).map(PathBuf::from)
}

fn var_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn var_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `.env` content into key/value pairs.
///
/// Accepts `KEY=value` and `export KEY=value`. Blank lines and `#` comments
/// are skipped, surrounding quotes are stripped, and lines without `=` are
/// ignored.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    // Unquoted values may carry a trailing comment.
    match value.find(" #") {
        Some(idx) => value[..idx].trim_end(),
        None => value,
    }
}

/// Load a `.env` file into the process environment.
///
/// Variables already present in the environment win. Returns the number of
/// variables set; a missing file sets nothing.
pub fn load_dotenv(path: &Path) -> std::io::Result<usize> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut loaded = 0;
    for (key, value) in parse_dotenv(&content) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            loaded += 1;
        }
    }
    tracing::debug!(path = %path.display(), loaded, "loaded env file");
    Ok(loaded)
}

/// Set `key` in a `.env` file, replacing an existing assignment.
///
/// Other lines are preserved in order. The file is created when missing.
pub fn upsert_dotenv(path: &Path, key: &str, value: &str) -> std::io::Result<()> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let assignment = format!("{key}={value}");
    let mut replaced = false;
    let mut lines: Vec<String> = existing
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let is_key = trimmed
                .split_once('=')
                .is_some_and(|(k, _)| k.trim() == key);
            if is_key && !replaced {
                replaced = true;
                assignment.clone()
            } else {
                line.to_string()
            }
        })
        .collect();
    if !replaced {
        lines.push(assignment);
    }

    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
