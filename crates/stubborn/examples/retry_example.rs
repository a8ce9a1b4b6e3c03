//! Example: Retrying flaky operations until a deadline
//!
//! This example demonstrates:
//! 1. Async retry with jittered delays
//! 2. A predicate that refuses to retry permanent failures
//! 3. The blocking engine, which retries back to back
//! 4. Loading per-call options from JSON and the environment
//!
//! Run with:
//! ```bash
//! RUST_LOG=stubborn=debug cargo run -p stubborn --example retry_example
//! ```

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use stubborn::prelude::*;

/// Failures reported by the simulated service
#[derive(Debug, Clone, PartialEq)]
enum ServiceFailure {
    Overloaded,
    NotFound,
}

/// A simulated service that is overloaded for its first few requests
#[derive(Clone)]
struct FlakyService {
    requests: Arc<AtomicU32>,
    overloaded_for: u32,
}

impl FlakyService {
    fn new(overloaded_for: u32) -> Self {
        Self {
            requests: Arc::new(AtomicU32::new(0)),
            overloaded_for,
        }
    }

    async fn lookup(&self, key: &'static str) -> Result<String, ServiceFailure> {
        let request = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(Duration::from_millis(5)).await;

        if request <= self.overloaded_for {
            println!("  Request {}: overloaded", request);
            Err(ServiceFailure::Overloaded)
        } else if key == "missing" {
            println!("  Request {}: not found", request);
            Err(ServiceFailure::NotFound)
        } else {
            println!("  Request {}: ok", request);
            Ok(format!("value of {}", key))
        }
    }

    fn total_requests(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Example 1: Async retry with jittered delays
async fn example_async_retry() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Async Retry with Jitter ===\n");

    let service = FlakyService::new(3);
    let lookup = retryify_async(
        {
            let service = service.clone();
            move |key: &'static str| {
                let service = service.clone();
                async move { service.lookup(key).await }
            }
        },
        RetryifyOptions {
            is_retriable: |failure: &ServiceFailure| *failure == ServiceFailure::Overloaded,
        },
    );

    let lookup = lookup.with_options(
        AsyncRetryOptions::new(Duration::from_secs(5)).with_interval(Duration::from_millis(200)),
    );

    let start = Instant::now();
    let value = lookup.call("greeting").await.map_err(|f| format!("{:?}", f))?;

    println!("\nResult: {}", value);
    println!("Total requests: {}", service.total_requests());
    println!("Total time: {:?} (each delay is random in [0, 200ms))", start.elapsed());

    Ok(())
}

/// Example 2: Permanent failures are returned immediately
async fn example_non_retriable() {
    println!("\n=== Example 2: Non-Retriable Failure ===\n");

    let service = FlakyService::new(0);
    let lookup = retryify_async(
        {
            let service = service.clone();
            move |key: &'static str| {
                let service = service.clone();
                async move { service.lookup(key).await }
            }
        },
        RetryifyOptions {
            is_retriable: |failure: &ServiceFailure| *failure == ServiceFailure::Overloaded,
        },
    )
    .with_options(AsyncRetryOptions::new(Duration::from_secs(5)));

    let result = lookup.call("missing").await;

    println!("\nResult: {:?}", result);
    println!("Total requests: {} (no retries)", service.total_requests());
}

/// Example 3: The blocking engine retries without sleeping
fn example_blocking_retry() {
    println!("\n=== Example 3: Blocking Retry ===\n");

    let reads = AtomicU32::new(0);
    let read_lock = retryify(
        |path: &str| {
            let read = reads.fetch_add(1, Ordering::SeqCst) + 1;
            if read < 1_000 {
                Err(format!("{} is locked", path))
            } else {
                Ok(read)
            }
        },
        RetryifyOptions {
            is_retriable: |failure: &String| failure.ends_with("locked"),
        },
    )
    .with_options(RetryOptions::new(Duration::from_millis(500)));

    let start = Instant::now();
    let result = read_lock.call("/var/run/app.lock");

    println!("Result: {:?}", result);
    println!("Elapsed: {:?} for {} reads", start.elapsed(), reads.load(Ordering::SeqCst));
}

/// Example 4: Options from configuration
fn example_options_from_config() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 4: Options from Configuration ===\n");

    let options = AsyncRetryOptions::from_json(r#"{ "timeout": 30000 }"#)?;
    println!("From JSON: {:?}", options);
    println!("Effective interval: {:?}", options.interval_or_default());

    match AsyncRetryOptions::from_env() {
        Ok(options) => println!("From environment: {:?}", options),
        Err(err) => println!("From environment: {}", err),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    example_async_retry().await?;
    example_non_retriable().await;
    example_blocking_retry();
    example_options_from_config()?;

    Ok(())
}
