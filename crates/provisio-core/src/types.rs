// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declaration model shared by sources, resolvers, and the registry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Normalized lookup key for a provider name.
///
/// Names are matched case-insensitively; declarations keep their original spelling.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Ordered string-to-string parameter mapping handed to [`Provider::initialize`].
///
/// Insertion order is preserved. Lookups through [`Parameters::get`] fall back
/// to a case-insensitive match when no exact key exists.
///
/// [`Provider::initialize`]: crate::traits::Provider::initialize
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(IndexMap<String, String>);

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .or_else(|| {
                self.0
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<IndexMap<String, String>> for Parameters {
    fn from(map: IndexMap<String, String>) -> Self {
        Self(map)
    }
}

/// One named plugin entry as supplied by a declaration source.
///
/// Immutable once adopted by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Provider name, unique per section (case-insensitively).
    pub name: String,
    /// Identifier the instance resolver maps to a concrete type.
    #[serde(rename = "type")]
    pub type_identifier: String,
    /// Parameters passed to the provider on initialization.
    #[serde(default)]
    pub parameters: Parameters,
}

impl Declaration {
    /// Create a declaration without parameters.
    pub fn new(name: impl Into<String>, type_identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_identifier: type_identifier.into(),
            parameters: Parameters::new(),
        }
    }

    /// Add a parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key, value);
        self
    }

    /// Replace all parameters.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// The result of loading a declaration source: ordered declarations plus an
/// optional explicit default provider name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationSet {
    pub declarations: Vec<Declaration>,
    pub default_name: Option<String>,
}

impl DeclarationSet {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self {
            declarations,
            default_name: None,
        }
    }

    /// Set the explicit default provider name. Blank names are ignored.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.default_name = (!name.trim().is_empty()).then_some(name);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }
}
