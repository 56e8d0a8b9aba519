// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded exponential backoff for rate-limited and transient failures.

use std::future::Future;
use std::time::Duration;

use super::error::ClientError;
use crate::config::RetryConfig;
use crate::time::{CancellationToken, Clock, Deadline};

/// Attempt budget and delay curve
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before attempt `attempt + 1`, where `attempt` starts at 1.
    ///
    /// A server `Retry-After` wins over the computed backoff; both are capped
    /// at `max_delay`.
    pub fn delay_for(&self, attempt: u32, err: &ClientError) -> Duration {
        let computed = err.retry_after().unwrap_or_else(|| {
            let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
            self.base_delay.saturating_mul(factor)
        });
        computed.min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails permanently or the budget runs out.
    ///
    /// A retry is only attempted when its delay fits before `deadline`; the
    /// last error is returned otherwise. On a clock that drives the tokio
    /// timer each attempt is also cut off at the deadline.
    pub async fn run<T, F, Fut>(
        &self,
        clock: &dyn Clock,
        deadline: &Deadline,
        cancel: &CancellationToken,
        label: &str,
        mut op: F,
    ) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut attempt = 1;
        loop {
            let err = match bounded(clock, deadline, label, op()).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !err.is_retryable() || attempt >= self.max_attempts {
                return Err(err);
            }

            let delay = self.delay_for(attempt, &err);
            if delay >= deadline.remaining(clock) {
                tracing::debug!(label, ?delay, "retry would overrun deadline");
                return Err(err);
            }

            tracing::warn!(
                label,
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying remote call"
            );
            clock.sleep(delay).await;
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }
            attempt += 1;
        }
    }
}

/// Await one attempt, giving up with `Timeout` once `deadline` passes.
async fn bounded<T, Fut>(
    clock: &dyn Clock,
    deadline: &Deadline,
    label: &str,
    attempt: Fut,
) -> Result<T, ClientError>
where
    Fut: Future<Output = Result<T, ClientError>>,
{
    if !clock.drives_tokio_timer() {
        return attempt.await;
    }
    match tokio::time::timeout(deadline.remaining(clock), attempt).await {
        Ok(result) => result,
        Err(_) => {
            let elapsed = deadline.elapsed(clock);
            tracing::warn!(
                label,
                elapsed_ms = elapsed.as_millis() as u64,
                "remote call stalled past deadline"
            );
            Err(ClientError::Timeout { elapsed })
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
