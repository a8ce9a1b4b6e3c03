//! Per-call options for the retry engines.
//!
//! Options are plain values so they can be built in code, deserialized from a
//! config document (durations are integer milliseconds on the wire), or read
//! from the environment.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::time::Duration;

/// Backoff window used by the async engine when no interval is given.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(1000);

/// Environment variable holding the retry timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "STUBBORN_RETRY_TIMEOUT_MS";

/// Environment variable holding the async backoff interval in milliseconds.
pub const INTERVAL_ENV: &str = "STUBBORN_RETRY_INTERVAL_MS";

/// Options for one instantiation of the blocking retry engine.
///
/// The blocking engine retries back to back, so the only knob is how long it
/// may keep trying.
///
/// # Examples
///
/// ```rust
/// use stubborn::config::RetryOptions;
/// use std::time::Duration;
///
/// let options = RetryOptions::from_json(r#"{ "timeout": 250 }"#).unwrap();
/// assert_eq!(options, RetryOptions::new(Duration::from_millis(250)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryOptions {
    /// Wall-clock budget measured from the start of each call
    #[serde(with = "millis")]
    pub timeout: Duration,
}

impl RetryOptions {
    /// Create options with the given timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Parse options from a JSON document such as `{"timeout": 1000}`.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load options from the environment.
    ///
    /// Reads `STUBBORN_RETRY_TIMEOUT_MS`, which is required.
    pub fn from_env() -> Result<Self> {
        let timeout =
            read_millis(TIMEOUT_ENV)?.ok_or(ConfigError::MissingEnv { var: TIMEOUT_ENV })?;
        Ok(Self { timeout })
    }
}

/// Options for one instantiation of the async retry engine.
///
/// # Examples
///
/// ```rust
/// use stubborn::config::{AsyncRetryOptions, DEFAULT_RETRY_INTERVAL};
/// use std::time::Duration;
///
/// let options = AsyncRetryOptions::new(Duration::from_secs(5));
/// assert_eq!(options.interval_or_default(), DEFAULT_RETRY_INTERVAL);
///
/// let options = options.with_interval(Duration::from_millis(50));
/// assert_eq!(options.interval_or_default(), Duration::from_millis(50));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncRetryOptions {
    /// Wall-clock budget measured from the start of each call
    #[serde(with = "millis")]
    pub timeout: Duration,

    /// Exclusive upper bound of the random delay between attempts
    #[serde(
        default,
        with = "millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval: Option<Duration>,
}

impl AsyncRetryOptions {
    /// Create options with the given timeout and the default interval.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: None,
        }
    }

    /// Set the backoff interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// The configured interval, or [`DEFAULT_RETRY_INTERVAL`].
    pub fn interval_or_default(&self) -> Duration {
        self.interval.unwrap_or(DEFAULT_RETRY_INTERVAL)
    }

    /// Parse options from a JSON document such as
    /// `{"timeout": 1000, "interval": 10}`.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load options from the environment.
    ///
    /// Reads `STUBBORN_RETRY_TIMEOUT_MS` (required) and
    /// `STUBBORN_RETRY_INTERVAL_MS` (optional).
    pub fn from_env() -> Result<Self> {
        let RetryOptions { timeout } = RetryOptions::from_env()?;
        let interval = read_millis(INTERVAL_ENV)?;
        Ok(Self { timeout, interval })
    }
}

impl From<RetryOptions> for AsyncRetryOptions {
    fn from(options: RetryOptions) -> Self {
        Self::new(options.timeout)
    }
}

fn read_millis(var: &'static str) -> Result<Option<Duration>> {
    let value = match std::env::var(var) {
        Ok(value) => value,
        Err(VarError::NotPresent) => return Ok(None),
        Err(VarError::NotUnicode(_)) => return Err(ConfigError::NotUnicodeEnv { var }),
    };

    match value.trim().parse::<u64>() {
        Ok(ms) => Ok(Some(Duration::from_millis(ms))),
        Err(source) => Err(ConfigError::InvalidEnv { var, value, source }),
    }
}

/// Serde adapter storing a `Duration` as integer milliseconds.
mod millis {
    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(duration.as_millis()).map_err(|_| {
            S::Error::custom(format!("duration {duration:?} does not fit in u64 milliseconds"))
        })?;
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(
            duration: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match duration {
                Some(duration) => super::serialize(duration, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
        }
    }
}
