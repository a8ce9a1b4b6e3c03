//! Example: Substituting fallbacks for failures
//!
//! Run with:
//! ```bash
//! cargo run -p stubborn --example attempt_example
//! ```

use std::collections::HashMap;
use stubborn::prelude::*;

#[tokio::main]
async fn main() {
    println!("\n=== Blocking fallback ===\n");

    let parse_workers = attemptify(
        |raw: &str| raw.trim().parse::<usize>(),
        AttemptifyOptions {
            on_error: |err: std::num::ParseIntError| {
                println!("  Could not parse worker count ({}), using 4", err);
                4
            },
        },
    );

    println!("workers = {}", parse_workers.call("16"));
    println!("workers = {}", parse_workers.call("many"));

    println!("\n=== Async fallback ===\n");

    let mut cache = HashMap::new();
    cache.insert("home", "/srv/app");

    let resolve = attemptify_async(
        move |name: &'static str| {
            let found = cache.get(name).map(|path| path.to_string());
            async move { found.ok_or(name) }
        },
        AttemptifyOptions {
            on_error: |name: &'static str| format!("/tmp/{}", name),
        },
    );

    println!("home  -> {}", resolve.call("home").await);
    println!("cache -> {}", resolve.call("cache").await);
}
