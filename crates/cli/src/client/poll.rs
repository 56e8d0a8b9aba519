// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run polling as an explicit state machine.
//!
//! Each [`RunPoller::step`] performs at most one sleep and one status fetch,
//! so the deadline and the cancellation token are observed between every
//! remote interaction.

use std::time::Duration;

use super::error::ClientError;
use super::retry::RetryPolicy;
use super::transport::AssistantTransport;
use super::types::Run;
use crate::time::{CancellationToken, Clock, Deadline};

/// Where a remote run stands
#[derive(Clone, Debug, PartialEq)]
pub enum RunPhase {
    /// Still queued or running; `polls` status fetches so far
    Pending { run: Run, polls: u32 },
    Succeeded(Run),
    /// Terminal failure state
    Failed(Run),
    /// Deadline passed before a terminal state
    TimedOut { run: Run, elapsed: Duration },
    Cancelled(Run),
}

impl RunPhase {
    /// Classify a freshly fetched run
    pub fn from_run(run: Run, polls: u32) -> Self {
        if run.status.is_pending() {
            Self::Pending { run, polls }
        } else if run.status.is_success() {
            Self::Succeeded(run)
        } else {
            Self::Failed(run)
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }

    pub fn run(&self) -> &Run {
        match self {
            Self::Pending { run, .. }
            | Self::Succeeded(run)
            | Self::Failed(run)
            | Self::TimedOut { run, .. }
            | Self::Cancelled(run) => run,
        }
    }
}

/// Drives one run of one thread to a terminal phase
pub struct RunPoller<'a> {
    pub transport: &'a dyn AssistantTransport,
    pub clock: &'a dyn Clock,
    pub cancel: &'a CancellationToken,
    pub retry: &'a RetryPolicy,
    pub thread_id: &'a str,
    pub interval: Duration,
    pub deadline: Deadline,
}

impl RunPoller<'_> {
    /// Advance a phase by one transition. Terminal phases are returned as is.
    pub async fn step(&self, phase: RunPhase) -> Result<RunPhase, ClientError> {
        let (run, polls) = match phase {
            RunPhase::Pending { run, polls } => (run, polls),
            terminal => return Ok(terminal),
        };

        if self.cancel.is_cancelled() {
            return Ok(RunPhase::Cancelled(run));
        }
        if self.deadline.is_expired(self.clock) {
            return Ok(RunPhase::TimedOut {
                elapsed: self.deadline.elapsed(self.clock),
                run,
            });
        }

        let wait = self.interval.min(self.deadline.remaining(self.clock));
        self.clock.sleep(wait).await;
        if self.cancel.is_cancelled() {
            return Ok(RunPhase::Cancelled(run));
        }

        let fetched = self
            .retry
            .run(self.clock, &self.deadline, self.cancel, "retrieve_run", || {
                self.transport.retrieve_run(self.thread_id, &run.id)
            })
            .await;
        let fetched = match fetched {
            Ok(fetched) => fetched,
            // A fetch cut off at the deadline leaves the run pending remotely.
            Err(ClientError::Timeout { elapsed }) => {
                return Ok(RunPhase::TimedOut { run, elapsed });
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(
            run_id = %fetched.id,
            status = %fetched.status,
            polls = polls + 1,
            "polled run"
        );
        Ok(RunPhase::from_run(fetched, polls + 1))
    }

    /// Step until terminal
    pub async fn drive(&self, run: Run) -> Result<RunPhase, ClientError> {
        let mut phase = RunPhase::from_run(run, 0);
        while !phase.is_terminal() {
            phase = self.step(phase).await?;
        }
        Ok(phase)
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
