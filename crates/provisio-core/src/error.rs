// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Provisio provider registry.

use std::sync::Arc;

use thiserror::Error;

/// Boxed error returned by collaborators (sources, resolvers, providers, hooks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared error cause. Shared so that a memoized failure can be handed out
/// to every caller of the same provider.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// The error type returned by every registry operation.
///
/// Cloning is cheap: causes are reference counted, and a clone of a memoized
/// construction failure points at the very same cause.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A caller passed an empty or blank argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested name is not declared in the current generation.
    #[error("the provider with the name {name} is not configured on the {section} section")]
    ProviderNotFound { name: String, section: String },

    /// Resolving, initializing, or post-processing a declared provider failed.
    #[error("the provider type {type_identifier} with name {name} could not be created: {source}")]
    ProviderCreation {
        name: String,
        type_identifier: String,
        source: SharedError,
    },

    /// Neither the declaration source nor the fallback supplier declared anything.
    #[error(
        "there are no providers configured, make sure the {section} section is configured \
         properly and declares at least one provider"
    )]
    MissingConfiguration { section: String },

    /// The declaration source failed to load its declarations.
    #[error("failed to load the {section} section: {source}")]
    Source { section: String, source: SharedError },
}

impl RegistryError {
    /// Wrap a collaborator failure for the provider `name` of type `type_identifier`.
    pub fn creation(
        name: impl Into<String>,
        type_identifier: impl Into<String>,
        cause: BoxError,
    ) -> Self {
        RegistryError::ProviderCreation {
            name: name.into(),
            type_identifier: type_identifier.into(),
            source: Arc::from(cause),
        }
    }

    /// Wrap a declaration source failure.
    pub fn load_failure(section: impl Into<String>, cause: BoxError) -> Self {
        RegistryError::Source {
            section: section.into(),
            source: Arc::from(cause),
        }
    }

    /// Returns the provider name this error concerns, if any.
    pub fn provider_name(&self) -> Option<&str> {
        match self {
            RegistryError::ProviderNotFound { name, .. }
            | RegistryError::ProviderCreation { name, .. } => Some(name),
            _ => None,
        }
    }
}
