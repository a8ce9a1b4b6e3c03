//! Property-based tests for stubborn
//!
//! This module uses proptest to check the invariants the retry engines rely
//! on across a wide range of intervals, samples and timestamps.

#[cfg(test)]
mod tests {
    use crate::observability::{Engine, GiveUpReason};
    use crate::retry::jitter::scale;
    use crate::retry::{Decision, RetrySession};
    use proptest::prelude::*;
    use std::time::{Duration, Instant};

    // ===== Strategy Generators =====

    fn arb_interval_ms() -> impl Strategy<Value = u64> {
        1u64..120_000u64
    }

    fn arb_sample() -> impl Strategy<Value = f64> {
        0.0f64..1.0f64
    }

    // ===== Jitter Properties =====

    proptest! {
        /// Property: jittered delays stay inside the backoff window
        /// Invariant: 0 <= delay < interval for every sample in [0, 1)
        #[test]
        fn prop_delay_within_window(
            interval_ms in arb_interval_ms(),
            sample in arb_sample(),
        ) {
            let interval = Duration::from_millis(interval_ms);
            let delay = scale(interval, sample);

            prop_assert!(delay < interval);
            prop_assert_eq!(delay.subsec_nanos() % 1_000_000, 0);
        }

        /// Property: the delay never drifts more than one millisecond from
        /// interval * sample
        #[test]
        fn prop_delay_tracks_sample(
            interval_ms in arb_interval_ms(),
            sample in arb_sample(),
        ) {
            let delay_ms = scale(Duration::from_millis(interval_ms), sample).as_millis() as f64;
            let exact = interval_ms as f64 * sample;

            prop_assert!((delay_ms - exact).abs() <= 1.0);
        }

        /// Property: larger samples never produce shorter delays
        #[test]
        fn prop_delay_monotonic(
            interval_ms in arb_interval_ms(),
            a in arb_sample(),
            b in arb_sample(),
        ) {
            let interval = Duration::from_millis(interval_ms);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };

            prop_assert!(scale(interval, low) <= scale(interval, high));
        }
    }

    // ===== Session Properties =====

    proptest! {
        /// Property: a retriable failure is retried iff it is observed
        /// strictly before the deadline
        #[test]
        fn prop_retry_iff_before_deadline(
            timeout_ms in 0u64..10_000u64,
            observed_ms in 0u64..20_000u64,
        ) {
            let start = Instant::now();
            let mut session = RetrySession::start(
                Engine::Blocking,
                start,
                Duration::from_millis(timeout_ms),
            );

            let decision = session.record_failure(true, start + Duration::from_millis(observed_ms));
            if observed_ms < timeout_ms {
                prop_assert_eq!(decision, Decision::Retry);
            } else {
                prop_assert_eq!(decision, Decision::GiveUp(GiveUpReason::DeadlineExceeded));
            }
        }

        /// Property: a rejected failure ends the session regardless of time
        #[test]
        fn prop_rejection_always_gives_up(
            timeout_ms in 0u64..10_000u64,
            observed_ms in 0u64..20_000u64,
        ) {
            let start = Instant::now();
            let mut session = RetrySession::start(
                Engine::Async,
                start,
                Duration::from_millis(timeout_ms),
            );

            prop_assert_eq!(
                session.record_failure(false, start + Duration::from_millis(observed_ms)),
                Decision::GiveUp(GiveUpReason::NotRetriable)
            );
        }

        /// Property: the failure count matches the number of recorded failures
        #[test]
        fn prop_failures_counted(failures in 1u64..200u64) {
            let start = Instant::now();
            let mut session = RetrySession::start(Engine::Blocking, start, Duration::from_secs(60));

            for _ in 0..failures {
                session.record_failure(true, start);
            }

            prop_assert_eq!(session.failures(), failures);
        }
    }
}
