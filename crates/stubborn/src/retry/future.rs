//! Async retry engine with jittered delays.

use super::RetryifyOptions;
use super::jitter;
use super::session::{Decision, RetrySession};
use crate::config::AsyncRetryOptions;
use crate::observability::{self, Engine};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wrap an async operation so it can be retried until a deadline.
///
/// Like [`retryify`](super::retryify), this only fixes what is retriable;
/// [`AsyncRetryified::with_options`] supplies the timeout and backoff
/// interval. Between attempts the engine sleeps for a random delay drawn
/// uniformly from `[0, interval)`.
///
/// # Examples
///
/// ```rust
/// use stubborn::config::AsyncRetryOptions;
/// use stubborn::retry::{RetryifyOptions, retryify_async};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let attempts = Arc::new(AtomicU32::new(0));
/// let fetch = retryify_async(
///     {
///         let attempts = Arc::clone(&attempts);
///         move |id: u64| {
///             let attempts = Arc::clone(&attempts);
///             async move {
///                 if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
///                     Err("unavailable")
///                 } else {
///                     Ok(id * 10)
///                 }
///             }
///         }
///     },
///     RetryifyOptions {
///         is_retriable: |error: &&str| *error == "unavailable",
///     },
/// );
///
/// let fetch = fetch.with_options(
///     AsyncRetryOptions::new(Duration::from_secs(5)).with_interval(Duration::from_millis(10)),
/// );
/// assert_eq!(fetch.call(4).await, Ok(40));
/// assert_eq!(attempts.load(Ordering::SeqCst), 3);
/// # }
/// ```
pub fn retryify_async<F, Fut, P, A, T, E>(
    operation: F,
    options: RetryifyOptions<P>,
) -> AsyncRetryified<F, P>
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    AsyncRetryified {
        operation: Arc::new(operation),
        is_retriable: Arc::new(options.is_retriable),
    }
}

/// An async operation paired with its retriability predicate.
///
/// Produced by [`retryify_async`]. Cheap to clone; clones share the operation.
pub struct AsyncRetryified<F, P> {
    operation: Arc<F>,
    is_retriable: Arc<P>,
}

impl<F, P> AsyncRetryified<F, P> {
    /// Instantiate the retrying operation with a per-call timeout and an
    /// optional backoff interval (default 1000ms).
    pub fn with_options(&self, options: AsyncRetryOptions) -> AsyncRetrying<F, P> {
        AsyncRetrying {
            operation: Arc::clone(&self.operation),
            is_retriable: Arc::clone(&self.is_retriable),
            timeout: options.timeout,
            interval: options.interval_or_default(),
        }
    }
}

impl<F, P> Clone for AsyncRetryified<F, P> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            is_retriable: Arc::clone(&self.is_retriable),
        }
    }
}

impl<F, P> fmt::Debug for AsyncRetryified<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncRetryified").finish_non_exhaustive()
    }
}

/// The retrying form of an async operation.
pub struct AsyncRetrying<F, P> {
    operation: Arc<F>,
    is_retriable: Arc<P>,
    timeout: Duration,
    interval: Duration,
}

impl<F, P> AsyncRetrying<F, P> {
    /// The wall-clock budget applied to each call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The exclusive upper bound of the delay between attempts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Invoke the operation until it succeeds, the predicate rejects a
    /// failure, or the deadline has passed.
    ///
    /// The deadline is `now + timeout`, measured when the returned future is
    /// first polled. After a retriable failure the deadline is checked once;
    /// the following delay is then always served and the next attempt always
    /// launched, even if the deadline passes while sleeping. A zero delay
    /// launches the next attempt without yielding.
    ///
    /// Dropping the returned future drops the in-flight attempt and any
    /// pending timer.
    pub async fn call<A, Fut, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        A: Clone,
    {
        let mut session = RetrySession::start(Engine::Async, now(), self.timeout);

        loop {
            let failure = match (self.operation)(args.clone()).await {
                Ok(value) => {
                    session.record_success(now());
                    return Ok(value);
                }
                Err(failure) => failure,
            };

            let retriable = (self.is_retriable)(&failure);
            if let Decision::GiveUp(_) = session.record_failure(retriable, now()) {
                return Err(failure);
            }
            drop(failure);

            let delay = jitter::jittered_delay(self.interval);
            if !delay.is_zero() {
                observability::log_delay(session.failures(), delay);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

impl<F, P> Clone for AsyncRetrying<F, P> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            is_retriable: Arc::clone(&self.is_retriable),
            timeout: self.timeout,
            interval: self.interval,
        }
    }
}

impl<F, P> fmt::Debug for AsyncRetrying<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncRetrying")
            .field("timeout", &self.timeout)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

// Read through tokio's clock so paused-time tests move deadlines too.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RETRY_INTERVAL;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn always_failing(
        calls: Arc<AtomicU32>,
    ) -> impl Fn(()) -> std::future::Ready<Result<(), u32>> {
        move |()| std::future::ready(Err(calls.fetch_add(1, Ordering::SeqCst) + 1))
    }

    #[test]
    fn test_default_interval_applied() {
        let retrying = retryify_async(
            always_failing(Arc::new(AtomicU32::new(0))),
            RetryifyOptions {
                is_retriable: |_: &u32| true,
            },
        )
        .with_options(AsyncRetryOptions::new(Duration::from_secs(1)));

        assert_eq!(retrying.interval(), DEFAULT_RETRY_INTERVAL);
        assert_eq!(retrying.timeout(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let retrying = retryify_async(
            |x: i32| async move { Ok::<_, ()>(x + 1) },
            RetryifyOptions {
                is_retriable: |_: &()| -> bool { panic!("predicate must not run on success") },
            },
        )
        .with_options(AsyncRetryOptions::new(Duration::from_millis(10)));

        assert_eq!(retrying.call(1).await, Ok(2));
    }

    #[test]
    fn test_zero_interval_never_suspends() {
        let calls = Arc::new(AtomicU32::new(0));
        let retrying = retryify_async(
            always_failing(Arc::clone(&calls)),
            RetryifyOptions {
                is_retriable: |failure: &u32| *failure < 50,
            },
        )
        .with_options(
            AsyncRetryOptions::new(Duration::from_secs(60)).with_interval(Duration::ZERO),
        );

        // All 50 attempts must complete within a single poll.
        let mut call = tokio_test::task::spawn(retrying.call(()));
        let result = tokio_test::assert_ready!(call.poll());

        assert_eq!(result, Err(50));
        assert_eq!(calls.load(Ordering::SeqCst), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_gives_single_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let retrying = retryify_async(
            always_failing(Arc::clone(&calls)),
            RetryifyOptions {
                is_retriable: |_: &u32| true,
            },
        )
        .with_options(AsyncRetryOptions::new(Duration::ZERO));

        assert_eq!(retrying.call(()).await, Err(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_not_rechecked_after_delay() {
        // Every delay is at most 99ms, so an attempt that passes the check at
        // 950ms still runs after the deadline.
        let calls = Arc::new(AtomicU32::new(0));
        let last_attempt_at = Arc::new(std::sync::Mutex::new(None));
        let retrying = retryify_async(
            {
                let calls = Arc::clone(&calls);
                let last_attempt_at = Arc::clone(&last_attempt_at);
                move |start: tokio::time::Instant| {
                    *last_attempt_at.lock().unwrap() = Some(start.elapsed());
                    std::future::ready(Err::<(), _>(calls.fetch_add(1, Ordering::SeqCst)))
                }
            },
            RetryifyOptions {
                is_retriable: |_: &u32| true,
            },
        )
        .with_options(
            AsyncRetryOptions::new(Duration::from_secs(1)).with_interval(Duration::from_millis(100)),
        );

        let start = tokio::time::Instant::now();
        assert!(retrying.call(start).await.is_err());

        let last = last_attempt_at.lock().unwrap().expect("at least one attempt");
        assert!(last >= Duration::from_secs(1));
        assert!(last < Duration::from_millis(1100));
    }

    #[tokio::test]
    async fn test_future_is_send() {
        let retrying = retryify_async(
            |x: u8| async move { Ok::<_, String>(x) },
            RetryifyOptions {
                is_retriable: |_: &String| true,
            },
        )
        .with_options(AsyncRetryOptions::new(Duration::from_millis(10)));

        let handle = tokio::spawn(async move { retrying.call(9).await });
        assert_eq!(handle.await.unwrap(), Ok(9));
    }
}
