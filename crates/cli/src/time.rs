// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Time abstraction for deterministic testing.
//!
//! The poll loop and the retry policy only observe time through [`Clock`],
//! so tests drive them with [`FakeClock`] and never wait on the wall clock.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Clock trait for time abstraction
pub trait Clock: Send + Sync {
    /// Get current time as milliseconds since epoch
    fn now_millis(&self) -> u64;

    /// Sleep for a duration
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Get current time as Duration since epoch
    fn now(&self) -> Duration {
        Duration::from_millis(self.now_millis())
    }

    /// Whether this clock follows the tokio timer, so tokio timeouts agree with it
    fn drives_tokio_timer(&self) -> bool {
        false
    }
}

/// Real clock using system time
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn drives_tokio_timer(&self) -> bool {
        true
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_millis: Arc<AtomicU64>,
    auto_advance: bool,
    sleeps: Arc<AtomicU64>,
}

impl FakeClock {
    /// Create a new fake clock starting at a given time
    pub fn new(start_millis: u64) -> Self {
        Self {
            current_millis: Arc::new(AtomicU64::new(start_millis)),
            auto_advance: true,
            sleeps: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a fake clock starting at Unix epoch
    pub fn at_epoch() -> Self {
        Self::new(0)
    }

    /// Create a clone with auto-advance disabled
    pub fn without_auto_advance(&self) -> Self {
        Self {
            current_millis: Arc::clone(&self.current_millis),
            auto_advance: false,
            sleeps: Arc::clone(&self.sleeps),
        }
    }

    /// Advance time by a duration
    pub fn advance(&self, duration: Duration) {
        self.current_millis
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    /// Advance time by milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.current_millis.fetch_add(ms, Ordering::SeqCst);
    }

    /// Number of sleeps requested so far, across clones
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::at_epoch()
    }
}

impl Clock for FakeClock {
    fn now_millis(&self) -> u64 {
        self.current_millis.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        if self.auto_advance {
            self.advance(duration);
        }
        // No actual sleep - return immediately
        Box::pin(async {})
    }
}

/// Clock handle that can be either real or fake
#[derive(Clone, Debug)]
pub enum ClockHandle {
    System(SystemClock),
    Fake(FakeClock),
}

impl ClockHandle {
    /// Create a system clock handle
    pub fn system() -> Self {
        Self::System(SystemClock)
    }

    /// Create a fake clock handle at epoch
    pub fn fake_at_epoch() -> Self {
        Self::Fake(FakeClock::at_epoch())
    }

    /// Get as fake clock for manipulation (returns None for system clock)
    pub fn as_fake(&self) -> Option<&FakeClock> {
        match self {
            Self::Fake(f) => Some(f),
            Self::System(_) => None,
        }
    }
}

impl Clock for ClockHandle {
    fn now_millis(&self) -> u64 {
        match self {
            Self::System(c) => c.now_millis(),
            Self::Fake(c) => c.now_millis(),
        }
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        match self {
            Self::System(c) => c.sleep(duration),
            Self::Fake(c) => c.sleep(duration),
        }
    }

    fn drives_tokio_timer(&self) -> bool {
        matches!(self, Self::System(_))
    }
}

impl Default for ClockHandle {
    fn default() -> Self {
        Self::system()
    }
}

impl From<FakeClock> for ClockHandle {
    fn from(clock: FakeClock) -> Self {
        Self::Fake(clock)
    }
}

/// Fixed time budget measured against a [`Clock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    start_millis: u64,
    budget: Duration,
}

impl Deadline {
    /// Start a budget at the clock's current time
    pub fn after(clock: &dyn Clock, budget: Duration) -> Self {
        Self {
            start_millis: clock.now_millis(),
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time spent since the deadline was started
    pub fn elapsed(&self, clock: &dyn Clock) -> Duration {
        Duration::from_millis(clock.now_millis().saturating_sub(self.start_millis))
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self, clock: &dyn Clock) -> Duration {
        self.budget.saturating_sub(self.elapsed(clock))
    }

    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        self.elapsed(clock) >= self.budget
    }
}

/// Cooperative cancellation flag shared between a caller and a generation.
///
/// Checked between poll steps and between retry attempts.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
