//! Configuration error types.
//!
//! The wrappers themselves never introduce an error type: whatever the wrapped
//! operation fails with is handed back unchanged. The only errors owned by this
//! crate come from loading retry options out of JSON or the environment.

use std::num::ParseIntError;
use thiserror::Error;

/// Result type for configuration loading.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Errors that can occur while loading retry options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options document was not valid JSON or did not match the schema.
    #[error("invalid retry options: {0}")]
    Json(#[from] serde_json::Error),

    /// A required environment variable was not set.
    #[error("missing environment variable {var}")]
    MissingEnv {
        /// Name of the variable
        var: &'static str,
    },

    /// An environment variable was set but is not valid unicode.
    #[error("environment variable {var} is not valid unicode")]
    NotUnicodeEnv {
        /// Name of the variable
        var: &'static str,
    },

    /// An environment variable was set but is not a millisecond count.
    #[error("environment variable {var} must be an integer number of milliseconds, got {value:?}")]
    InvalidEnv {
        /// Name of the variable
        var: &'static str,
        /// Raw value found in the environment
        value: String,
        /// Underlying parse failure
        #[source]
        source: ParseIntError,
    },
}
