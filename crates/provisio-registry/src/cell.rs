// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compute-once cell used for per-provider construction.
//!
//! A [`BuildCell`] runs its build closure at most once at a time. Concurrent
//! callers block on a condition variable until the running build settles and
//! then observe the same outcome, success or failure.

use parking_lot::{Condvar, Mutex};

/// What a cell does with a failed build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep the error: every later caller gets it without rebuilding.
    #[default]
    Memoize,
    /// Hand the error to the callers that were waiting on the failed attempt,
    /// then let the next caller build again.
    Retry,
}

enum State<T, E> {
    Empty,
    Running,
    Ready(T),
    Failed(E),
}

/// One-shot construction slot with cached success or failure.
pub struct BuildCell<T, E> {
    state: Mutex<State<T, E>>,
    settled: Condvar,
}

impl<T: Clone, E: Clone> BuildCell<T, E> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Empty),
            settled: Condvar::new(),
        }
    }

    /// Returns the built value, if the cell holds one.
    pub fn get(&self) -> Option<T> {
        match &*self.state.lock() {
            State::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(&*self.state.lock(), State::Ready(_))
    }

    /// Returns the cached value or error, running `build` if the cell is empty.
    ///
    /// The lock is not held while `build` runs. If `build` panics the cell goes
    /// back to empty and waiters are woken; one of them builds next.
    pub fn get_or_try_init<F>(&self, policy: FailurePolicy, build: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut state = self.state.lock();
        let mut waited = false;
        loop {
            match &*state {
                State::Ready(value) => return Ok(value.clone()),
                State::Failed(err) if waited || policy == FailurePolicy::Memoize => {
                    return Err(err.clone());
                }
                State::Empty | State::Failed(_) => break,
                State::Running => {}
            }
            waited = true;
            self.settled.wait(&mut state);
        }
        *state = State::Running;
        drop(state);

        let reset = ResetOnUnwind { cell: self };
        let outcome = build();
        drop(reset);

        *self.state.lock() = match &outcome {
            Ok(value) => State::Ready(value.clone()),
            Err(err) => State::Failed(err.clone()),
        };
        self.settled.notify_all();
        outcome
    }
}

impl<T: Clone, E: Clone> Default for BuildCell<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> std::fmt::Debug for BuildCell<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.state.lock() {
            State::Empty => "empty",
            State::Running => "running",
            State::Ready(_) => "ready",
            State::Failed(_) => "failed",
        };
        f.debug_struct("BuildCell").field("state", &state).finish()
    }
}

struct ResetOnUnwind<'a, T, E> {
    cell: &'a BuildCell<T, E>,
}

impl<T, E> Drop for ResetOnUnwind<'_, T, E> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            *self.cell.state.lock() = State::Empty;
            self.cell.settled.notify_all();
        }
    }
}
