// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::time::FakeClock;
use std::sync::atomic::{AtomicU32, Ordering};

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(250),
    }
}

fn server_error() -> ClientError {
    ClientError::RemoteError {
        status: Some(503),
        detail: "overloaded".into(),
    }
}

#[test]
fn delay_doubles_and_caps() {
    let p = policy();
    let err = server_error();
    assert_eq!(p.delay_for(1, &err), Duration::from_millis(100));
    assert_eq!(p.delay_for(2, &err), Duration::from_millis(200));
    assert_eq!(p.delay_for(3, &err), Duration::from_millis(250));
    assert_eq!(p.delay_for(40, &err), Duration::from_millis(250));
}

#[test]
fn retry_after_overrides_backoff_within_cap() {
    let p = RetryPolicy {
        max_delay: Duration::from_secs(30),
        ..policy()
    };
    let err = ClientError::RateLimited {
        retry_after: Some(Duration::from_secs(2)),
        detail: String::new(),
    };
    assert_eq!(p.delay_for(1, &err), Duration::from_secs(2));
}

#[test]
fn from_config_converts_milliseconds() {
    let p = RetryPolicy::from(&RetryConfig::default());
    assert_eq!(p.max_attempts, 3);
    assert_eq!(p.base_delay, Duration::from_secs(1));
    assert_eq!(p.max_delay, Duration::from_secs(30));
}

#[tokio::test]
async fn transient_failure_then_success() {
    let clock = FakeClock::at_epoch();
    let deadline = Deadline::after(&clock, Duration::from_secs(10));
    let calls = AtomicU32::new(0);

    let result = policy()
        .run(&clock, &deadline, &CancellationToken::new(), "test", || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(server_error())
            } else {
                Ok("done")
            }
        })
        .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(clock.now_millis(), 100);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let clock = FakeClock::at_epoch();
    let deadline = Deadline::after(&clock, Duration::from_secs(10));
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = policy()
        .run(&clock, &deadline, &CancellationToken::new(), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(server_error())
        })
        .await;

    assert_eq!(result.unwrap_err(), server_error());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(clock.now_millis(), 300);
}

#[tokio::test]
async fn permanent_errors_are_not_retried() {
    let clock = FakeClock::at_epoch();
    let deadline = Deadline::after(&clock, Duration::from_secs(10));
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = policy()
        .run(&clock, &deadline, &CancellationToken::new(), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::AuthError("bad key".into()))
        })
        .await;

    assert!(result.unwrap_err().is_auth());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(clock.sleep_count(), 0);
}

#[tokio::test]
async fn retry_never_extends_past_deadline() {
    let clock = FakeClock::at_epoch();
    let deadline = Deadline::after(&clock, Duration::from_millis(150));
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = policy()
        .run(&clock, &deadline, &CancellationToken::new(), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::RateLimited {
                retry_after: None,
                detail: String::new(),
            })
        })
        .await;

    // First retry (100ms) fits, the second (200ms) would not.
    assert!(matches!(result, Err(ClientError::RateLimited { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(clock.now_millis(), 100);
}

#[tokio::test]
async fn cancellation_stops_retrying() {
    let clock = FakeClock::at_epoch();
    let deadline = Deadline::after(&clock, Duration::from_secs(10));
    let cancel = CancellationToken::new();

    let result: Result<(), _> = policy()
        .run(&clock, &deadline, &cancel, "test", || {
            cancel.cancel();
            async { Err(server_error()) }
        })
        .await;

    assert_eq!(result.unwrap_err(), ClientError::Cancelled);
}

#[tokio::test]
async fn stalled_attempt_on_system_clock_ends_at_deadline() {
    let clock = crate::time::SystemClock;
    let deadline = Deadline::after(&clock, Duration::from_millis(40));
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = policy()
        .run(&clock, &deadline, &CancellationToken::new(), "stall", || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending()
        })
        .await;

    assert!(matches!(result, Err(ClientError::Timeout { .. })), "got {result:?}");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn delay_never_exceeds_cap(
            attempt in 1u32..64,
            base_ms in 0u64..10_000,
            max_ms in 0u64..60_000,
        ) {
            let policy = RetryPolicy {
                max_attempts: 5,
                base_delay: Duration::from_millis(base_ms),
                max_delay: Duration::from_millis(max_ms),
            };
            prop_assert!(policy.delay_for(attempt, &server_error()) <= policy.max_delay);
        }

        #[test]
        fn delay_grows_with_attempts(attempt in 1u32..32) {
            let policy = RetryPolicy {
                max_attempts: 5,
                base_delay: Duration::from_millis(10),
                max_delay: Duration::from_secs(3600),
            };
            let err = server_error();
            prop_assert!(policy.delay_for(attempt + 1, &err) >= policy.delay_for(attempt, &err));
        }
    }
}
