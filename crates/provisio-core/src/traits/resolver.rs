// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a type identifier into an uninitialized provider instance.

use crate::error::BoxError;

/// Produces a raw, uninitialized provider for a declared type identifier.
pub trait InstanceResolver<P: ?Sized>: Send + Sync {
    /// Create an instance of `type_identifier` for the provider called `name`.
    fn resolve(&self, type_identifier: &str, name: &str) -> Result<Box<P>, BoxError>;
}

impl<P, F> InstanceResolver<P> for F
where
    P: ?Sized,
    F: Fn(&str, &str) -> Result<Box<P>, BoxError> + Send + Sync,
{
    fn resolve(&self, type_identifier: &str, name: &str) -> Result<Box<P>, BoxError> {
        self(type_identifier, name)
    }
}
