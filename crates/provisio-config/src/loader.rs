// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declaration loader using Figment.
//!
//! A section is read from a TOML document and may be overridden by a single
//! environment variable, `<PREFIX>DEFAULT_PROVIDER`.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use figment::{
    Figment,
    error::Kind,
    providers::{Env, Format, Toml},
};

use crate::model::ProvidersSection;

/// Extract `section` from TOML content.
///
/// A document without the section yields an empty [`ProvidersSection`].
pub fn load_section_from_str(
    content: &str,
    section: &str,
) -> Result<ProvidersSection, figment::Error> {
    extract_section(&Figment::new().merge(Toml::string(content)), section)
}

/// Extract `section` from TOML content with `<prefix>DEFAULT_PROVIDER`
/// overriding the section's `default_provider`.
pub fn load_section_with_env(
    content: &str,
    section: &str,
    env_prefix: &str,
) -> Result<ProvidersSection, figment::Error> {
    let figment = Figment::new()
        .merge(Toml::string(content))
        .merge(env_provider(env_prefix, section));
    extract_section(&figment, section)
}

fn extract_section(figment: &Figment, section: &str) -> Result<ProvidersSection, figment::Error> {
    match figment.find_value(section) {
        Ok(_) => figment.extract_inner(section),
        Err(err) if matches!(err.kind, Kind::MissingField(_)) => Ok(ProvidersSection::default()),
        Err(err) => Err(err),
    }
}

/// Map `<PREFIX>DEFAULT_PROVIDER` onto `<section>.default_provider`.
///
/// Only that one key is honored so stray variables sharing the prefix cannot
/// inject unknown fields into the section.
fn env_provider(prefix: &str, section: &str) -> Env {
    let section = section.to_string();
    Env::prefixed(prefix)
        .only(&["default_provider"])
        .map(move |key| format!("{section}.{key}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_section_is_empty() {
        let section = load_section_from_str("[other]\nkey = \"value\"\n", "greeters").unwrap();
        assert!(section.providers.is_empty());
        assert!(section.default_provider.is_none());
    }

    #[test]
    fn empty_document_is_empty() {
        let section = load_section_from_str("", "providers").unwrap();
        assert!(section.providers.is_empty());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(load_section_from_str("[greeters\nname = ", "greeters").is_err());
    }

    #[test]
    fn env_overrides_default_provider() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PROVISIO_TEST_DEFAULT_PROVIDER", "Spanish");
            jail.set_env("PROVISIO_TEST_UNRELATED", "ignored");
            let content = r#"
[greeters]
default_provider = "English"

[[greeters.providers]]
name = "English"
type = "greeting.english"
"#;
            let section = load_section_with_env(content, "greeters", "PROVISIO_TEST_")?;
            assert_eq!(section.default_provider.as_deref(), Some("Spanish"));
            Ok(())
        });
    }
}
