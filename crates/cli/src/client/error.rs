// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote client error taxonomy.

use std::time::Duration;

/// Errors from a remote generation
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Timed out after {:.1}s without a terminal run state", .elapsed.as_secs_f64())]
    Timeout { elapsed: Duration },

    #[error("Remote error{}: {detail}", status_suffix(.status))]
    RemoteError { status: Option<u16>, detail: String },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Rate limited{}: {detail}", retry_suffix(.retry_after))]
    RateLimited {
        retry_after: Option<Duration>,
        detail: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Client not configured: {0}")]
    NotConfigured(String),

    #[error("Generation cancelled")]
    Cancelled,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn retry_suffix(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|d| format!(" (retry after {}s)", d.as_secs()))
        .unwrap_or_default()
}

impl ClientError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: &str, retry_after: Option<Duration>) -> Self {
        let detail = error_detail(body);
        match status {
            401 | 403 => Self::AuthError(detail),
            429 => Self::RateLimited {
                retry_after,
                detail,
            },
            _ => Self::RemoteError {
                status: Some(status),
                detail,
            },
        }
    }

    /// Credential failures make every later remote call useless.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthError(_))
    }

    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Transport(_) => true,
            Self::RemoteError {
                status: Some(status),
                ..
            } => *status >= 500,
            _ => false,
        }
    }

    /// Server-provided wait before retrying, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Short variant name for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "Timeout",
            Self::RemoteError { .. } => "RemoteError",
            Self::AuthError(_) => "AuthError",
            Self::MalformedResponse(_) => "MalformedResponse",
            Self::RateLimited { .. } => "RateLimited",
            Self::Transport(_) => "Transport",
            Self::NotConfigured(_) => "NotConfigured",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Pull `error.message` out of an OpenAI error body, else the trimmed body.
fn error_detail(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });
    match message {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().chars().take(200).collect(),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
