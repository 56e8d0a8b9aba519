// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::client::fake::ScriptedTransport;
use crate::client::types::RunStatus;
use crate::time::FakeClock;

fn pending(status: RunStatus) -> RunPhase {
    RunPhase::from_run(
        Run {
            id: "run_1".to_string(),
            status,
            last_error: None,
        },
        0,
    )
}

struct Harness {
    transport: ScriptedTransport,
    clock: FakeClock,
    cancel: CancellationToken,
    retry: RetryPolicy,
}

impl Harness {
    fn new(transport: ScriptedTransport) -> Self {
        Self {
            transport,
            clock: FakeClock::at_epoch(),
            cancel: CancellationToken::new(),
            retry: RetryPolicy::none(),
        }
    }

    fn poller(&self, budget: Duration) -> RunPoller<'_> {
        RunPoller {
            transport: &self.transport,
            clock: &self.clock,
            cancel: &self.cancel,
            retry: &self.retry,
            thread_id: "thread_1",
            interval: Duration::from_millis(500),
            deadline: Deadline::after(&self.clock, budget),
        }
    }
}

#[test]
fn from_run_classifies_statuses() {
    assert!(!pending(RunStatus::Queued).is_terminal());
    assert!(!pending(RunStatus::InProgress).is_terminal());
    assert!(!pending(RunStatus::Cancelling).is_terminal());
    assert!(matches!(pending(RunStatus::Completed), RunPhase::Succeeded(_)));
    assert!(matches!(pending(RunStatus::Failed), RunPhase::Failed(_)));
    assert!(matches!(pending(RunStatus::Expired), RunPhase::Failed(_)));
}

#[tokio::test]
async fn step_sleeps_one_interval_then_fetches() {
    let h = Harness::new(ScriptedTransport::new().with_run_statuses([RunStatus::InProgress]));
    let poller = h.poller(Duration::from_secs(10));

    let next = poller.step(pending(RunStatus::Queued)).await.unwrap();

    match next {
        RunPhase::Pending { run, polls } => {
            assert_eq!(run.status, RunStatus::InProgress);
            assert_eq!(polls, 1);
        }
        other => panic!("unexpected phase: {other:?}"),
    }
    assert_eq!(h.clock.now_millis(), 500);
    assert_eq!(h.transport.call_count("retrieve_run"), 1);
}

#[tokio::test]
async fn step_clips_sleep_to_remaining_budget() {
    let h = Harness::new(ScriptedTransport::new().with_run_statuses([RunStatus::Queued]));
    let poller = h.poller(Duration::from_millis(300));

    let next = poller.step(pending(RunStatus::Queued)).await.unwrap();
    assert_eq!(h.clock.now_millis(), 300);

    let last = poller.step(next).await.unwrap();
    assert_eq!(
        last,
        RunPhase::TimedOut {
            run: pending(RunStatus::Queued).run().clone(),
            elapsed: Duration::from_millis(300),
        }
    );
    assert_eq!(h.transport.call_count("retrieve_run"), 1);
}

#[tokio::test]
async fn step_observes_cancellation_before_fetching() {
    let h = Harness::new(ScriptedTransport::new());
    let poller = h.poller(Duration::from_secs(10));
    h.cancel.cancel();

    let next = poller.step(pending(RunStatus::InProgress)).await.unwrap();

    assert!(matches!(next, RunPhase::Cancelled(_)));
    assert!(h.transport.calls().is_empty());
    assert_eq!(h.clock.sleep_count(), 0);
}

#[tokio::test]
async fn terminal_phase_is_returned_unchanged() {
    let h = Harness::new(ScriptedTransport::new());
    let poller = h.poller(Duration::from_secs(10));
    let done = pending(RunStatus::Completed);

    assert_eq!(poller.step(done.clone()).await.unwrap(), done);
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn drive_counts_polls_until_terminal() {
    let h = Harness::new(ScriptedTransport::new().with_run_statuses([
        RunStatus::Queued,
        RunStatus::InProgress,
        RunStatus::Completed,
    ]));
    let poller = h.poller(Duration::from_secs(10));

    let phase = poller
        .drive(pending(RunStatus::Queued).run().clone())
        .await
        .unwrap();

    assert!(matches!(phase, RunPhase::Succeeded(_)));
    assert_eq!(h.transport.call_count("retrieve_run"), 3);
    assert_eq!(h.clock.now_millis(), 1500);
}

#[tokio::test]
async fn fetch_errors_propagate() {
    let h = Harness::new(
        ScriptedTransport::new().failing("retrieve_run", ClientError::AuthError("revoked".into())),
    );
    let poller = h.poller(Duration::from_secs(10));

    let err = poller.step(pending(RunStatus::Queued)).await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn fetch_cut_off_at_deadline_times_the_run_out() {
    let h = Harness::new(ScriptedTransport::new().failing(
        "retrieve_run",
        ClientError::Timeout {
            elapsed: Duration::from_secs(10),
        },
    ));
    let poller = h.poller(Duration::from_secs(10));

    let next = poller.step(pending(RunStatus::Queued)).await.unwrap();

    match next {
        RunPhase::TimedOut { run, elapsed } => {
            assert_eq!(run.status, RunStatus::Queued);
            assert_eq!(elapsed, Duration::from_secs(10));
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
}
