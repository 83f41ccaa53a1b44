// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML declaration sources for the Provisio provider registry.
//!
//! Provides section parsing with strict validation (`deny_unknown_fields`),
//! an environment override for the default provider, change detection for
//! file-backed sources, and Elm-style diagnostic error rendering with typo
//! suggestions.
//!
//! # Usage
//!
//! ```
//! use provisio_config::load_declarations;
//!
//! let toml = r#"
//! [greeters]
//! default_provider = "Spanish"
//!
//! [[greeters.providers]]
//! name = "English"
//! type = "greeting.english"
//!
//! [[greeters.providers]]
//! name = "Spanish"
//! type = "greeting.spanish"
//! parameters = { greetname = "Juan Perez" }
//! "#;
//!
//! let set = load_declarations(toml, "<inline>", "greeters", None).unwrap();
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.default_name.as_deref(), Some("Spanish"));
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod source;
pub mod validation;

pub use diagnostic::{ConfigError, LoadError, render};
pub use model::{ProviderSettings, ProvidersSection};
pub use source::{TomlFileSource, TomlStrSource};

use provisio_core::DeclarationSet;

/// Parse, validate, and convert one section of a TOML document.
///
/// `origin` names the document in diagnostics. With `env_prefix` set,
/// `<prefix>DEFAULT_PROVIDER` overrides the section's default provider.
/// A document without the section yields an empty set.
pub fn load_declarations(
    content: &str,
    origin: &str,
    section: &str,
    env_prefix: Option<&str>,
) -> Result<DeclarationSet, LoadError> {
    let parsed = match env_prefix {
        Some(prefix) => loader::load_section_with_env(content, section, prefix),
        None => loader::load_section_from_str(content, section),
    };

    let parsed = parsed.map_err(|err| {
        LoadError::new(
            origin,
            diagnostic::figment_to_config_errors(err, origin, content),
        )
    })?;

    validation::validate_section(section, &parsed).map_err(|errors| LoadError::new(origin, errors))?;

    let set = parsed.into_declaration_set();
    tracing::debug!(
        origin,
        section,
        providers = set.len(),
        "parsed provider declarations"
    );
    Ok(set)
}
