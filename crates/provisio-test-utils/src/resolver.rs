// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instrumented resolver for construction-count and failure tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use provisio_core::{BoxError, InstanceResolver};

/// Resolver wrapper that counts resolutions per provider name.
///
/// Clones share their counters, so a test can keep one clone and hand the
/// other to a registry. Names marked with [`fail_for`](Self::fail_for) are
/// refused without reaching the inner resolver.
pub struct CountingResolver<P: ?Sized> {
    inner: Arc<dyn InstanceResolver<P>>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    delay: Duration,
}

impl<P: ?Sized + 'static> CountingResolver<P> {
    pub fn new(inner: impl InstanceResolver<P> + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            calls: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            delay: Duration::ZERO,
        }
    }

    /// Sleep this long inside every resolution, widening race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Refuse to resolve the provider called `name`.
    pub fn fail_for(&self, name: &str) {
        self.failing.lock().insert(name.to_string());
    }

    /// Resolve `name` normally again.
    pub fn heal(&self, name: &str) {
        self.failing.lock().remove(name);
    }

    /// Number of resolutions requested for the provider called `name`.
    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().get(name).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

impl<P: ?Sized> Clone for CountingResolver<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            calls: Arc::clone(&self.calls),
            failing: Arc::clone(&self.failing),
            delay: self.delay,
        }
    }
}

impl<P: ?Sized> InstanceResolver<P> for CountingResolver<P> {
    fn resolve(&self, type_identifier: &str, name: &str) -> Result<Box<P>, BoxError> {
        *self.calls.lock().entry(name.to_string()).or_insert(0) += 1;
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.failing.lock().contains(name) {
            return Err(format!("resolver refused {type_identifier} for {name}").into());
        }
        self.inner.resolve(type_identifier, name)
    }
}
