//! Uniform jitter for the async engine.
//!
//! Delays are drawn uniformly from `[0, interval)` with millisecond
//! resolution. There is no growth between attempts and no floor above zero.

use std::time::Duration;

/// Draw a delay in `[0, interval)` using the thread-local RNG.
pub fn jittered_delay(interval: Duration) -> Duration {
    scale(interval, rand::random::<f64>())
}

/// Map a sample in `[0, 1)` onto a whole-millisecond delay in `[0, interval)`.
///
/// The product is rounded to the nearest millisecond and then capped one
/// millisecond below `interval`, since rounding alone can reach `interval`
/// for samples close to 1. An interval shorter than one millisecond always
/// yields zero.
pub fn scale(interval: Duration, sample: f64) -> Duration {
    let interval_ms = interval.as_millis().min(u64::MAX as u128) as u64;
    if interval_ms == 0 {
        return Duration::ZERO;
    }

    let sample = sample.clamp(0.0, 1.0);
    let rounded = (interval_ms as f64 * sample).round() as u64;
    Duration::from_millis(rounded.min(interval_ms - 1))
}
