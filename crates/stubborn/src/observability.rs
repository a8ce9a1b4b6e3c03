//! Structured logging for retry sessions.
//!
//! All engine events go through this module so the field names stay the same
//! for the blocking and async engines. Failure payloads are opaque and never
//! logged; only the attempt number and the engine's decision are recorded.

use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// Which engine emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// The busy-retrying blocking engine
    Blocking,
    /// The jittered async engine
    Async,
}

impl Engine {
    fn as_str(self) -> &'static str {
        match self {
            Self::Blocking => "blocking",
            Self::Async => "async",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a retry session stopped without a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveUpReason {
    /// The predicate rejected the failure
    NotRetriable,
    /// The predicate accepted the failure but the deadline had passed
    DeadlineExceeded,
}

impl GiveUpReason {
    /// Stable identifier used as a log field value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotRetriable => "not_retriable",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

impl fmt::Display for GiveUpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn log_fallback(engine: Engine) {
    trace!(engine = %engine, "Operation failed, substituting fallback");
}

pub(crate) fn log_attempt_failed(engine: Engine, attempt: u64, retriable: bool) {
    trace!(
        engine = %engine,
        attempt,
        retriable,
        "Attempt failed"
    );
}

pub(crate) fn log_delay(attempt: u64, delay: Duration) {
    debug!(
        engine = %Engine::Async,
        attempt,
        delay_ms = delay.as_millis() as u64,
        "Delaying before next attempt"
    );
}

pub(crate) fn log_give_up(
    engine: Engine,
    attempts: u64,
    reason: GiveUpReason,
    elapsed: Duration,
) {
    debug!(
        engine = %engine,
        attempts,
        reason = %reason,
        elapsed_ms = elapsed.as_millis() as u64,
        "Giving up"
    );
}

pub(crate) fn log_success(engine: Engine, attempts: u64, elapsed: Duration) {
    if attempts > 1 {
        debug!(
            engine = %engine,
            attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            "Succeeded after retrying"
        );
    }
}
