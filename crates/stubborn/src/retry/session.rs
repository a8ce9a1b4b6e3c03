//! Per-call retry state shared by the blocking and async engines.

use crate::observability::{self, Engine, GiveUpReason};
use std::time::{Duration, Instant};

/// What the engine should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Launch another attempt
    Retry,
    /// Surface the failure to the caller
    GiveUp(GiveUpReason),
}

/// State of one call to a retrying operation.
///
/// A session is opened when the call starts and dropped when it resolves, so
/// two calls never share a deadline even when they go through the same
/// configured operation.
///
/// The session only decides; it never sleeps. The caller evaluates the
/// retriability predicate first and then asks the session, which reads the
/// clock after the predicate has run.
///
/// # Examples
///
/// ```rust
/// use stubborn::retry::{Decision, RetrySession};
/// use stubborn::observability::{Engine, GiveUpReason};
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut session = RetrySession::start(Engine::Blocking, start, Duration::from_millis(100));
///
/// assert_eq!(session.record_failure(true, start), Decision::Retry);
/// assert_eq!(
///     session.record_failure(false, start),
///     Decision::GiveUp(GiveUpReason::NotRetriable)
/// );
/// assert_eq!(
///     session.record_failure(true, start + Duration::from_millis(100)),
///     Decision::GiveUp(GiveUpReason::DeadlineExceeded)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RetrySession {
    engine: Engine,
    started: Instant,
    // None when `started + timeout` does not fit the clock.
    deadline: Option<Instant>,
    failures: u64,
}

impl RetrySession {
    /// Open a session at `now` with the given wall-clock budget.
    pub fn start(engine: Engine, now: Instant, timeout: Duration) -> Self {
        Self {
            engine,
            started: now,
            deadline: now.checked_add(timeout),
            failures: 0,
        }
    }

    /// The instant after which no further attempts are permitted, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Number of failed attempts recorded so far.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Whether the deadline has been reached at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time since the session was opened.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Record a failed attempt and decide whether to try again.
    ///
    /// `retriable` is the predicate's verdict on the failure. The deadline is
    /// only consulted when the predicate allowed a retry.
    pub fn record_failure(&mut self, retriable: bool, now: Instant) -> Decision {
        self.failures = self.failures.saturating_add(1);
        observability::log_attempt_failed(self.engine, self.failures, retriable);

        let reason = if !retriable {
            GiveUpReason::NotRetriable
        } else if self.is_expired(now) {
            GiveUpReason::DeadlineExceeded
        } else {
            return Decision::Retry;
        };

        observability::log_give_up(self.engine, self.failures, reason, self.elapsed(now));
        Decision::GiveUp(reason)
    }

    /// Record the successful attempt that ends the session.
    pub fn record_success(&self, now: Instant) {
        let attempts = self.failures.saturating_add(1);
        observability::log_success(self.engine, attempts, self.elapsed(now));
    }
}
