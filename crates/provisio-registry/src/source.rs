// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory declaration source.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;
use provisio_core::{BoxError, Declaration, DeclarationSet, DeclarationSource};

/// A declaration source held in memory.
///
/// [`replace`](StaticSource::replace) swaps the declarations and flags a
/// change, so a registry reading from this source starts a new generation on
/// its next call.
#[derive(Debug, Default)]
pub struct StaticSource {
    set: RwLock<DeclarationSet>,
    changed: AtomicBool,
    loads: AtomicUsize,
}

impl StaticSource {
    pub fn new(set: DeclarationSet) -> Self {
        Self {
            set: RwLock::new(set),
            changed: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        }
    }

    /// Source declaring `declarations` in order, without an explicit default.
    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self::new(DeclarationSet::new(declarations.into_iter().collect()))
    }

    /// Replace the declarations and mark the source changed.
    pub fn replace(&self, set: DeclarationSet) {
        *self.set.write() = set;
        self.changed.store(true, Ordering::Release);
    }

    /// Number of times `load` was called.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Acquire)
    }
}

impl DeclarationSource for StaticSource {
    fn load(&self) -> Result<DeclarationSet, BoxError> {
        // Clear the flag before reading so a concurrent replace is not lost.
        self.changed.store(false, Ordering::Release);
        self.loads.fetch_add(1, Ordering::AcqRel);
        Ok(self.set.read().clone())
    }

    fn has_changed(&self) -> bool {
        self.changed.load(Ordering::Acquire)
    }
}
