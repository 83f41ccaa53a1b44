// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits for the provider registry.
//!
//! The registry composes these instead of being subclassed: each seam is an
//! injectable trait object with a no-op or identity default.

pub mod fallback;
pub mod hook;
pub mod provider;
pub mod resolver;
pub mod source;

pub use fallback::{FALLBACK_TYPE, FallbackDeclarations, FallbackProvider, NoFallback};
pub use hook::{IdentityHook, PostInitHook};
pub use provider::Provider;
pub use resolver::InstanceResolver;
pub use source::{DeclarationSource, EmptySource};
