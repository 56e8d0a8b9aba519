// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Harness configuration loaded from `rtfcheck.toml`.
//!
//! Values are layered: defaults, then the TOML file, then environment
//! variables ([`HarnessConfig::apply_env`]), then CLI flags applied by the
//! binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "rtfcheck.toml";
/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model for chat mode and assistant creation
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
/// Prompt used by the special-characters robustness case
pub const DEFAULT_SPECIAL_CHARACTERS_PROMPT: &str =
    "Convertir en RTF: Caf\u{e9}, na\u{ef}ve, \u{a3}500, \u{a9} 2025";

/// Errors loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Which OpenAI surface the client talks to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ApiMode {
    /// Threads and runs, polled until terminal
    #[default]
    Assistants,
    /// A single chat completion request
    Chat,
}

/// Top-level harness configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub suite: SuiteConfig,
}

/// Remote client settings, passed explicitly to the client constructor
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ClientConfig {
    pub api_mode: ApiMode,
    pub base_url: String,
    pub model: String,
    pub assistant_id: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub retry: RetryConfig,

    /// Only ever taken from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_mode: ApiMode::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            assistant_id: None,
            temperature: 0.7,
            timeout_secs: 30,
            poll_interval_ms: 500,
            retry: RetryConfig::default(),
            api_key: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Backoff settings for rate-limited and transient failures
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

/// Suite selection and tolerances
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SuiteConfig {
    pub fixtures_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Sample names; discovered from `<fixtures_dir>/input` when empty
    pub samples: Vec<String>,
    pub tolerance: f64,
    pub integration_tolerance: f64,
    pub robustness_runs: u32,
    pub special_characters_prompt: String,
    pub min_output_len: usize,
    pub stop_on_auth_error: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: PathBuf::from("tests/fixtures"),
            output_dir: PathBuf::from("tests/output"),
            samples: Vec::new(),
            tolerance: rtf_check::DEFAULT_TOLERANCE,
            integration_tolerance: 0.80,
            robustness_runs: 2,
            special_characters_prompt: DEFAULT_SPECIAL_CHARACTERS_PROMPT.to_string(),
            min_output_len: 50,
            stop_on_auth_error: false,
        }
    }
}

impl HarnessConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and parse a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Locate and load the config file.
    ///
    /// An explicit path (flag or `RTFCHECK_CONFIG`) must exist. Otherwise
    /// `rtfcheck.toml` in the working directory is used when present, and
    /// defaults apply when it is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = env::config_path() {
            return Self::load(&path);
        }
        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            return Self::load(default);
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Overlay environment variables onto the loaded values
    pub fn apply_env(&mut self) {
        let client = &mut self.client;
        client.api_key = env::api_key();
        if let Some(id) = env::assistant_id() {
            client.assistant_id = Some(id);
        }
        if let Some(model) = env::model_id() {
            client.model = model;
        }
        if let Some(url) = env::base_url() {
            client.base_url = url;
        }
        if let Some(secs) = env::timeout_secs() {
            client.timeout_secs = secs;
        }
        if let Some(ms) = env::poll_interval_ms() {
            client.poll_interval_ms = ms;
        }
        if let Some(dir) = env::fixtures_dir() {
            self.suite.fixtures_dir = dir;
        }
        if let Some(dir) = env::output_dir() {
            self.suite.output_dir = dir;
        }
    }

    /// Reject values the harness cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ratio("suite.tolerance", self.suite.tolerance)?;
        check_ratio("suite.integration_tolerance", self.suite.integration_tolerance)?;
        if self.client.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "client.poll_interval_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "client.timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.client.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "client.retry.max_attempts",
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.client.temperature) {
            return Err(ConfigError::Invalid {
                field: "client.temperature",
                message: format!("{} is outside 0.0..=2.0", self.client.temperature),
            });
        }
        Ok(())
    }
}

fn check_ratio(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            message: format!("{value} is outside 0.0..=1.0"),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
