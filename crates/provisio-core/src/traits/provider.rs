// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability every provider type must satisfy.

use crate::error::BoxError;
use crate::types::Parameters;

/// The base trait for all providers managed by a registry.
///
/// A provider is created uninitialized by an [`InstanceResolver`], then
/// [`initialize`](Provider::initialize) is called exactly once with its
/// declared name and parameters.
///
/// [`InstanceResolver`]: crate::traits::InstanceResolver
pub trait Provider: Send + Sync + 'static {
    /// Record the provider name and merge declared parameters into internal state.
    fn initialize(&mut self, name: &str, parameters: &Parameters) -> Result<(), BoxError>;

    /// Returns the name recorded by `initialize`.
    fn name(&self) -> &str;
}
