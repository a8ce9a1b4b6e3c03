use super::AttemptifyOptions;
use crate::observability::{self, Engine};

/// Wrap a blocking operation so failures are replaced by a fallback value.
///
/// The operation runs exactly once per call. On `Err(e)`, `on_error(e)` runs
/// exactly once and its value is returned instead.
pub fn attemptify<F, H, A, T, E>(operation: F, options: AttemptifyOptions<H>) -> Attemptified<F, H>
where
    F: Fn(A) -> Result<T, E>,
    H: Fn(E) -> T,
{
    Attemptified {
        operation,
        on_error: options.on_error,
    }
}

/// A blocking operation that substitutes a fallback on failure.
#[derive(Clone)]
pub struct Attemptified<F, H> {
    operation: F,
    on_error: H,
}

impl<F, H> Attemptified<F, H> {
    /// Run the operation, falling back to `on_error` if it fails.
    pub fn call<A, T, E>(&self, args: A) -> T
    where
        F: Fn(A) -> Result<T, E>,
        H: Fn(E) -> T,
    {
        match (self.operation)(args) {
            Ok(value) => value,
            Err(failure) => {
                observability::log_fallback(Engine::Blocking);
                (self.on_error)(failure)
            }
        }
    }
}

impl<F, H> std::fmt::Debug for Attemptified<F, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attemptified").finish_non_exhaustive()
    }
}
