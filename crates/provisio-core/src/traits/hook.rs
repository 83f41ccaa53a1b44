// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-initialization transformation hook.

use crate::error::BoxError;
use crate::types::Declaration;

/// Called once per provider right after `initialize`.
///
/// The returned instance is what the registry caches. A hook that substitutes
/// a different instance must leave it in an equivalent initialized state; the
/// registry does not initialize the replacement.
pub trait PostInitHook<P: ?Sized>: Send + Sync {
    fn after_initialize(
        &self,
        instance: Box<P>,
        declaration: &Declaration,
    ) -> Result<Box<P>, BoxError>;
}

impl<P, F> PostInitHook<P> for F
where
    P: ?Sized,
    F: Fn(Box<P>, &Declaration) -> Result<Box<P>, BoxError> + Send + Sync,
{
    fn after_initialize(
        &self,
        instance: Box<P>,
        declaration: &Declaration,
    ) -> Result<Box<P>, BoxError> {
        self(instance, declaration)
    }
}

/// Returns every instance unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHook;

impl<P: ?Sized> PostInitHook<P> for IdentityHook {
    fn after_initialize(
        &self,
        instance: Box<P>,
        _declaration: &Declaration,
    ) -> Result<Box<P>, BoxError> {
        Ok(instance)
    }
}
