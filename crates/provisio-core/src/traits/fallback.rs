// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Providers used when the declaration source declares nothing.

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::types::{Declaration, Parameters};

/// Type identifier carried by declarations synthesized for fallback providers.
pub const FALLBACK_TYPE: &str = "<fallback>";

type Factory<P> = Arc<dyn Fn() -> Result<Box<P>, BoxError> + Send + Sync>;

/// A named, instance-producing thunk supplied when no configuration exists.
///
/// The instance still goes through `initialize` and the post-init hook.
pub struct FallbackProvider<P: ?Sized> {
    pub name: String,
    pub parameters: Parameters,
    factory: Factory<P>,
}

impl<P: ?Sized> FallbackProvider<P> {
    /// Create a fallback provider from an infallible factory.
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<P> + Send + Sync + 'static,
    {
        Self::try_new(name, move || Ok(factory()))
    }

    /// Create a fallback provider from a fallible factory.
    pub fn try_new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<P>, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters: Parameters::new(),
            factory: Arc::new(factory),
        }
    }

    /// Parameters passed to `initialize` (empty unless set).
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Run the factory.
    pub fn create(&self) -> Result<Box<P>, BoxError> {
        (self.factory)()
    }

    /// The declaration handed to the post-init hook for this provider.
    pub fn declaration(&self) -> Declaration {
        Declaration::new(self.name.clone(), FALLBACK_TYPE).with_parameters(self.parameters.clone())
    }
}

impl<P: ?Sized> Clone for FallbackProvider<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<P: ?Sized> fmt::Debug for FallbackProvider<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackProvider")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Supplies fallback providers, in order, when the primary source is empty.
pub trait FallbackDeclarations<P: ?Sized>: Send + Sync {
    fn fallback(&self) -> Vec<FallbackProvider<P>>;
}

impl<P, F> FallbackDeclarations<P> for F
where
    P: ?Sized,
    F: Fn() -> Vec<FallbackProvider<P>> + Send + Sync,
{
    fn fallback(&self) -> Vec<FallbackProvider<P>> {
        self()
    }
}

/// Supplies no fallback providers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl<P: ?Sized> FallbackDeclarations<P> for NoFallback {
    fn fallback(&self) -> Vec<FallbackProvider<P>> {
        Vec::new()
    }
}
