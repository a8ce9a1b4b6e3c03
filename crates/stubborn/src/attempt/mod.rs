//! Fallback-on-failure wrappers.
//!
//! [`attemptify`] and [`attemptify_async`] run an operation once and, if it
//! fails, hand the failure to an `on_error` handler whose return value takes
//! the place of the result. The wrapped operation therefore never fails; a
//! panic inside `on_error` propagates as usual.
//!
//! # Examples
//!
//! ```rust
//! use stubborn::attempt::{AttemptifyOptions, attemptify};
//!
//! let port = attemptify(
//!     |raw: &str| raw.parse::<u16>(),
//!     AttemptifyOptions {
//!         on_error: |_: std::num::ParseIntError| 8080,
//!     },
//! );
//!
//! assert_eq!(port.call("3000"), 3000);
//! assert_eq!(port.call("http"), 8080);
//! ```

mod future;
mod sync;

pub use future::{AsyncAttemptified, attemptify_async};
pub use sync::{Attemptified, attemptify};

/// Fallback configuration for the attemptify wrappers.
#[derive(Debug, Clone, Copy)]
pub struct AttemptifyOptions<H> {
    /// Handler turning a failure into a substitute result
    pub on_error: H,
}
