#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Stubborn control wrappers for fallible operations.
//!
//! This crate wraps an arbitrary operation in one of two behaviours:
//!
//! - **Attempt substitution** via [`attemptify`] / [`attemptify_async`]
//!   - Runs the operation once
//!   - Replaces a failure with the value of an `on_error` handler
//! - **Retrying** via [`retryify`] / [`retryify_async`]
//!   - A caller-supplied predicate decides which failures are retriable
//!   - A per-call wall-clock timeout bounds the session
//!   - The async engine sleeps a uniformly jittered delay between attempts;
//!     the blocking engine retries immediately
//!
//! Failures are opaque to the crate. Operations return `Result<T, E>` for any
//! `E`, and whatever `E` ends a retry session is returned unchanged.
//!
//! Operations take a single argument. Use a tuple for several and `()` for
//! none; the retry engines clone it for every attempt.
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use stubborn::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connect = retryify_async(
//!     |addr: &'static str| async move {
//!         tokio::net::TcpStream::connect(addr).await
//!     },
//!     RetryifyOptions {
//!         is_retriable: |error: &std::io::Error| {
//!             error.kind() == std::io::ErrorKind::ConnectionRefused
//!         },
//!     },
//! );
//!
//! let stream = connect
//!     .with_options(
//!         AsyncRetryOptions::new(Duration::from_secs(10))
//!             .with_interval(Duration::from_millis(250)),
//!     )
//!     .call("127.0.0.1:5432")
//!     .await?;
//! # drop(stream);
//! # Ok(())
//! # }
//! ```

pub mod attempt;
pub mod config;
pub mod error;
pub mod observability;
pub mod retry;

mod property_tests;

pub use attempt::{AttemptifyOptions, attemptify, attemptify_async};
pub use config::{AsyncRetryOptions, DEFAULT_RETRY_INTERVAL, RetryOptions};
pub use error::ConfigError;
pub use retry::{RetryifyOptions, retryify, retryify_async};

/// Convenient re-exports of commonly used items.
///
/// Import everything needed to wrap operations with:
///
/// ```rust
/// use stubborn::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attempt::{
        AsyncAttemptified, Attemptified, AttemptifyOptions, attemptify, attemptify_async,
    };
    pub use crate::config::{AsyncRetryOptions, DEFAULT_RETRY_INTERVAL, RetryOptions};
    pub use crate::retry::{
        AsyncRetrying, AsyncRetryified, Retrying, Retryified, RetryifyOptions, retryify,
        retryify_async,
    };
}
