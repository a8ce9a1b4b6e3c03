//! Retry engines.
//!
//! Retrying is split into two stages. [`retryify`] / [`retryify_async`] pair
//! an operation with a predicate deciding which failures are worth another
//! attempt. `with_options` then fixes the wall-clock budget for calls, giving
//! a [`Retrying`] / [`AsyncRetrying`] whose `call` does the work.
//!
//! # Key Types
//!
//! - [`Retrying`] - blocking engine, retries back to back with no delay
//! - [`AsyncRetrying`] - async engine, sleeps a random `[0, interval)` delay
//!   between attempts
//! - [`RetrySession`] - the per-call deadline state both engines share
//!
//! There is no attempt limit and no exponential growth. A call stops when the
//! operation succeeds, when the predicate rejects a failure, or when a
//! retriable failure is observed at or after the deadline. In the last two
//! cases the caller gets the operation's own failure back, untouched.
//!
//! # Examples
//!
//! ```rust
//! use stubborn::config::AsyncRetryOptions;
//! use stubborn::retry::{RetryifyOptions, retryify_async};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let ping = retryify_async(
//!     |host: &'static str| async move {
//!         // Your async operation here
//!         Err::<(), _>(format!("{host} unreachable"))
//!     },
//!     RetryifyOptions {
//!         is_retriable: |error: &String| error.ends_with("unreachable"),
//!     },
//! );
//!
//! let result = ping
//!     .with_options(AsyncRetryOptions::new(Duration::from_secs(2)))
//!     .call("db.internal")
//!     .await;
//! assert_eq!(result, Err("db.internal unreachable".to_string()));
//! # }
//! ```

mod future;
pub mod jitter;
mod session;
mod sync;

pub use future::{AsyncRetrying, AsyncRetryified, retryify_async};
pub use session::{Decision, RetrySession};
pub use sync::{Retrying, Retryified, retryify};

/// Operation-level retry configuration.
///
/// `is_retriable` sees every failure exactly once, before the deadline is
/// checked. Returning `false` ends the call with that failure.
#[derive(Debug, Clone, Copy)]
pub struct RetryifyOptions<P> {
    /// Predicate deciding whether a failure warrants another attempt
    pub is_retriable: P,
}
