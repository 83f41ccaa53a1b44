// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder for [`ProviderRegistry`].

use provisio_core::{
    BoxError, Declaration, DeclarationSource, EmptySource, FallbackDeclarations, IdentityHook,
    InstanceResolver, NoFallback, PostInitHook, Provider,
};

use crate::cell::FailurePolicy;
use crate::registry::ProviderRegistry;
use crate::resolver::TypeRegistry;

/// Section name used when none is configured.
pub const DEFAULT_SECTION: &str = "providers";

/// Composes a [`ProviderRegistry`] from its collaborators.
///
/// Every collaborator is optional:
/// - source: [`EmptySource`] (the fallback supplier decides)
/// - resolver: an empty [`TypeRegistry`] (every type is unknown)
/// - post-init hook: [`IdentityHook`]
/// - fallback: [`NoFallback`]
/// - failure policy: [`FailurePolicy::Memoize`]
pub struct RegistryBuilder<P: ?Sized + Provider> {
    section: String,
    source: Option<Box<dyn DeclarationSource>>,
    resolver: Option<Box<dyn InstanceResolver<P>>>,
    post_init: Option<Box<dyn PostInitHook<P>>>,
    fallback: Option<Box<dyn FallbackDeclarations<P>>>,
    failure_policy: FailurePolicy,
}

impl<P: ?Sized + Provider> RegistryBuilder<P> {
    pub fn new() -> Self {
        Self {
            section: DEFAULT_SECTION.to_string(),
            source: None,
            resolver: None,
            post_init: None,
            fallback: None,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Name of the configuration section, reported in errors and logs.
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn source(mut self, source: impl DeclarationSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn resolver(mut self, resolver: impl InstanceResolver<P> + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Use a closure `(type_identifier, name) -> instance` as the resolver.
    pub fn resolver_fn<F>(self, resolver: F) -> Self
    where
        F: Fn(&str, &str) -> Result<Box<P>, BoxError> + Send + Sync + 'static,
    {
        self.resolver(resolver)
    }

    pub fn post_init(mut self, hook: impl PostInitHook<P> + 'static) -> Self {
        self.post_init = Some(Box::new(hook));
        self
    }

    /// Use a closure `(instance, declaration) -> instance` as the post-init hook.
    pub fn post_init_fn<F>(self, hook: F) -> Self
    where
        F: Fn(Box<P>, &Declaration) -> Result<Box<P>, BoxError> + Send + Sync + 'static,
    {
        self.post_init(hook)
    }

    pub fn fallback(mut self, fallback: impl FallbackDeclarations<P> + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn build(self) -> ProviderRegistry<P> {
        ProviderRegistry::from_parts(
            self.section,
            self.source.unwrap_or_else(|| Box::new(EmptySource)),
            self.resolver
                .unwrap_or_else(|| Box::new(TypeRegistry::<P>::new())),
            self.post_init.unwrap_or_else(|| Box::new(IdentityHook)),
            self.fallback.unwrap_or_else(|| Box::new(NoFallback)),
            self.failure_policy,
        )
    }
}

impl<P: ?Sized + Provider> Default for RegistryBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
