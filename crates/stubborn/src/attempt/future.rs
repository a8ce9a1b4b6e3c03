use super::AttemptifyOptions;
use crate::observability::{self, Engine};
use std::future::Future;

/// Wrap an async operation so failures are replaced by a fallback value.
///
/// # Examples
///
/// ```rust
/// use stubborn::attempt::{AttemptifyOptions, attemptify_async};
///
/// # #[tokio::main]
/// # async fn main() {
/// let load = attemptify_async(
///     |key: &'static str| async move {
///         if key == "theme" { Ok("dark".to_string()) } else { Err(key) }
///     },
///     AttemptifyOptions {
///         on_error: |key: &'static str| format!("default {key}"),
///     },
/// );
///
/// assert_eq!(load.call("theme").await, "dark");
/// assert_eq!(load.call("font").await, "default font");
/// # }
/// ```
pub fn attemptify_async<F, Fut, H, A, T, E>(
    operation: F,
    options: AttemptifyOptions<H>,
) -> AsyncAttemptified<F, H>
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    H: Fn(E) -> T,
{
    AsyncAttemptified {
        operation,
        on_error: options.on_error,
    }
}

/// An async operation that substitutes a fallback on failure.
#[derive(Clone)]
pub struct AsyncAttemptified<F, H> {
    operation: F,
    on_error: H,
}

impl<F, H> AsyncAttemptified<F, H> {
    /// Await the operation, falling back to `on_error` if it fails.
    pub async fn call<A, Fut, T, E>(&self, args: A) -> T
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        H: Fn(E) -> T,
    {
        match (self.operation)(args).await {
            Ok(value) => value,
            Err(failure) => {
                observability::log_fallback(Engine::Async);
                (self.on_error)(failure)
            }
        }
    }
}

impl<F, H> std::fmt::Debug for AsyncAttemptified<F, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncAttemptified").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[tokio::test]
    async fn test_can_override_an_error() {
        let fn_args = Arc::new(Mutex::new(Vec::new()));
        let fallback_args = Arc::new(Mutex::new(Vec::new()));

        let attemptified = attemptify_async(
            {
                let fn_args = Arc::clone(&fn_args);
                move |should_fail: bool| {
                    fn_args.lock().unwrap().push(should_fail);
                    async move {
                        tokio::time::sleep(Duration::from_millis(1)).await;
                        if should_fail { Err("A") } else { Ok(1) }
                    }
                }
            },
            AttemptifyOptions {
                on_error: {
                    let fallback_args = Arc::clone(&fallback_args);
                    move |failure: &'static str| {
                        fallback_args.lock().unwrap().push(failure);
                        2
                    }
                },
            },
        );

        assert_eq!(attemptified.call(true).await, 2);
        assert_eq!(*fn_args.lock().unwrap(), vec![true]);
        assert_eq!(*fallback_args.lock().unwrap(), vec!["A"]);

        assert_eq!(attemptified.call(false).await, 1);
        assert_eq!(*fn_args.lock().unwrap(), vec![true, false]);
        assert_eq!(*fallback_args.lock().unwrap(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_fallback_not_called_until_awaited() {
        let fallbacks = Arc::new(AtomicU32::new(0));
        let attemptified = attemptify_async(
            |()| async { Err::<u32, _>(7u32) },
            AttemptifyOptions {
                on_error: {
                    let fallbacks = Arc::clone(&fallbacks);
                    move |failure: u32| {
                        fallbacks.fetch_add(1, Ordering::SeqCst);
                        failure * 2
                    }
                },
            },
        );

        let pending = attemptified.call(());
        tokio::task::yield_now().await;
        assert_eq!(fallbacks.load(Ordering::SeqCst), 0);
        assert_eq!(pending.await, 14);
        assert_eq!(fallbacks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_runs_on_any_executor() {
        let attemptified = attemptify_async(
            |name: &'static str| async move { Err::<String, _>(name) },
            AttemptifyOptions {
                on_error: |name: &'static str| name.to_uppercase(),
            },
        );

        assert_eq!(tokio_test::block_on(attemptified.call("quiet")), "QUIET");
    }
}
