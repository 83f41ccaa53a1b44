// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for a provider declaration section.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! keys, providing actionable error messages.

use indexmap::IndexMap;
use provisio_core::{Declaration, DeclarationSet};
use serde::{Deserialize, Serialize};

/// One provider declaration section, e.g. `[greeters]`.
///
/// ```toml
/// [greeters]
/// default_provider = "English"
///
/// [[greeters.providers]]
/// name = "English"
/// type = "greeting.english"
/// parameters = { greetname = "John Doe" }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersSection {
    /// Provider used when none is named. Defaults to the first declared.
    #[serde(default)]
    pub default_provider: Option<String>,

    /// Declared providers, in order.
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,
}

/// A single `[[<section>.providers]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    pub name: String,

    #[serde(rename = "type")]
    pub type_identifier: String,

    #[serde(default)]
    pub parameters: IndexMap<String, String>,
}

impl From<ProviderSettings> for Declaration {
    fn from(settings: ProviderSettings) -> Self {
        Declaration::new(settings.name, settings.type_identifier)
            .with_parameters(settings.parameters.into())
    }
}

impl ProvidersSection {
    /// Convert into the registry's declaration set, keeping declaration order.
    pub fn into_declaration_set(self) -> DeclarationSet {
        let set = DeclarationSet::new(self.providers.into_iter().map(Declaration::from).collect());
        match self.default_provider {
            Some(name) => set.with_default(name),
            None => set,
        }
    }
}
