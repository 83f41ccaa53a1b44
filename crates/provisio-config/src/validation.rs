// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for a declaration section.
//!
//! Validates constraints that cannot be expressed via serde attributes:
//! non-blank names and types, unique names, and a resolvable default.

use std::collections::HashMap;

use provisio_core::{name_key, suggest};

use crate::diagnostic::ConfigError;
use crate::model::ProvidersSection;

/// Validate a deserialized section.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_section(section_name: &str, section: &ProvidersSection) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut seen: HashMap<String, &str> = HashMap::new();

    for (index, provider) in section.providers.iter().enumerate() {
        let entry = format!("{section_name}.providers[{index}]");

        if provider.name.trim().is_empty() {
            errors.push(ConfigError::validation(format!("{entry}.name must not be empty")));
        } else if let Some(first) = seen.get(&name_key(&provider.name)) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "{entry}: duplicate provider name `{}` (names are case-insensitive)",
                    provider.name
                ),
                help: Some(format!("`{first}` is already declared in [{section_name}]")),
            });
        } else {
            seen.insert(name_key(&provider.name), &provider.name);
        }

        if provider.type_identifier.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "{entry}.type must not be empty"
            )));
        }
    }

    if let Some(default) = section.default_provider.as_deref()
        && !default.trim().is_empty()
        && !section.providers.is_empty()
        && !seen.contains_key(&name_key(default))
    {
        let names = section.providers.iter().map(|p| p.name.as_str());
        let help = match suggest(default, names) {
            Some(close) => format!("did you mean `{close}`?"),
            None => "set default_provider to one of the declared provider names".to_string(),
        };
        errors.push(ConfigError::Validation {
            message: format!(
                "{section_name}.default_provider `{default}` is not a declared provider"
            ),
            help: Some(help),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
