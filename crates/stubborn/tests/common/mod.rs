//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

/// Thread-safe record of the values a callback was invoked with.
#[derive(Debug)]
pub struct CallLog<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for CallLog<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> Clone for CallLog<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T: Clone> CallLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return how many entries exist afterwards.
    pub fn record(&self, entry: T) -> usize {
        let mut entries = self.entries.lock().unwrap();
        entries.push(entry);
        entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().unwrap().clone()
    }
}

/// Install a test subscriber so engine events show up with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stubborn=trace")),
        )
        .with_test_writer()
        .try_init();
}
