// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External supplier of provider declarations.

use std::sync::Arc;

use crate::error::BoxError;
use crate::types::DeclarationSet;

/// Supplies an ordered sequence of declarations plus an optional default name.
///
/// Implementations are called from whichever thread triggers a (re)load and
/// must be thread-safe on their own.
pub trait DeclarationSource: Send + Sync {
    /// Load the current declarations.
    fn load(&self) -> Result<DeclarationSet, BoxError>;

    /// Returns true if the contents changed since the last successful `load`.
    ///
    /// A source that never reports a change freezes the registry's view after
    /// the first load.
    fn has_changed(&self) -> bool {
        false
    }
}

impl<S: DeclarationSource + ?Sized> DeclarationSource for Arc<S> {
    fn load(&self) -> Result<DeclarationSet, BoxError> {
        (**self).load()
    }

    fn has_changed(&self) -> bool {
        (**self).has_changed()
    }
}

/// A source that declares nothing, leaving the fallback supplier in charge.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl DeclarationSource for EmptySource {
    fn load(&self) -> Result<DeclarationSet, BoxError> {
        Ok(DeclarationSet::default())
    }
}
