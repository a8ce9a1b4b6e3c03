//! Blocking retry engine.

use super::RetryifyOptions;
use super::session::{Decision, RetrySession};
use crate::config::RetryOptions;
use crate::observability::Engine;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wrap a blocking operation so it can be retried until a deadline.
///
/// This is the first of two stages: it fixes *what* is retriable. Call
/// [`Retryified::with_options`] to fix *how long* to keep trying and get the
/// retrying operation.
///
/// The blocking engine retries back to back with no delay between attempts.
///
/// # Examples
///
/// ```rust
/// use stubborn::config::RetryOptions;
/// use stubborn::retry::{RetryifyOptions, retryify};
/// use std::cell::Cell;
/// use std::time::Duration;
///
/// let calls = Cell::new(0);
/// let read = retryify(
///     |path: &str| {
///         calls.set(calls.get() + 1);
///         if calls.get() < 3 { Err("busy") } else { Ok(format!("read {path}")) }
///     },
///     RetryifyOptions {
///         is_retriable: |error: &&str| *error == "busy",
///     },
/// );
///
/// let read = read.with_options(RetryOptions::new(Duration::from_millis(100)));
/// assert_eq!(read.call("config.toml"), Ok("read config.toml".to_string()));
/// assert_eq!(calls.get(), 3);
/// ```
pub fn retryify<F, P, A, T, E>(operation: F, options: RetryifyOptions<P>) -> Retryified<F, P>
where
    F: Fn(A) -> Result<T, E>,
    P: Fn(&E) -> bool,
{
    Retryified {
        operation: Arc::new(operation),
        is_retriable: Arc::new(options.is_retriable),
    }
}

/// A blocking operation paired with its retriability predicate.
///
/// Produced by [`retryify`]. Cheap to clone; clones share the operation.
pub struct Retryified<F, P> {
    operation: Arc<F>,
    is_retriable: Arc<P>,
}

impl<F, P> Retryified<F, P> {
    /// Instantiate the retrying operation with a per-call timeout.
    ///
    /// Each result is independent; every call to [`Retrying::call`] measures
    /// its own deadline.
    pub fn with_options(&self, options: RetryOptions) -> Retrying<F, P> {
        Retrying {
            operation: Arc::clone(&self.operation),
            is_retriable: Arc::clone(&self.is_retriable),
            timeout: options.timeout,
        }
    }
}

impl<F, P> Clone for Retryified<F, P> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            is_retriable: Arc::clone(&self.is_retriable),
        }
    }
}

impl<F, P> fmt::Debug for Retryified<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retryified").finish_non_exhaustive()
    }
}

/// The retrying form of a blocking operation.
pub struct Retrying<F, P> {
    operation: Arc<F>,
    is_retriable: Arc<P>,
    timeout: Duration,
}

impl<F, P> Retrying<F, P> {
    /// The wall-clock budget applied to each call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke the operation until it succeeds, the predicate rejects a
    /// failure, or the deadline has passed.
    ///
    /// The deadline is `now + timeout`, measured when this method is entered.
    /// Every attempt receives a clone of `args`. On giving up, the most recent
    /// failure is returned exactly as the operation produced it.
    pub fn call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
        P: Fn(&E) -> bool,
        A: Clone,
    {
        let mut session = RetrySession::start(Engine::Blocking, Instant::now(), self.timeout);

        loop {
            let failure = match (self.operation)(args.clone()) {
                Ok(value) => {
                    session.record_success(Instant::now());
                    return Ok(value);
                }
                Err(failure) => failure,
            };

            let retriable = (self.is_retriable)(&failure);
            if let Decision::GiveUp(_) = session.record_failure(retriable, Instant::now()) {
                return Err(failure);
            }
        }
    }
}

impl<F, P> Clone for Retrying<F, P> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            is_retriable: Arc::clone(&self.is_retriable),
            timeout: self.timeout,
        }
    }
}

impl<F, P> fmt::Debug for Retrying<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrying")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
