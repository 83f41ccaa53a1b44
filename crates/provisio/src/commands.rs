// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `provisio list`, `provisio check`, and `provisio default`.
//!
//! Every command works on declarations only; no provider is constructed.
//! Commands return their output as text so `main` decides where it goes.

use std::path::{Path, PathBuf};

use provisio_config::TomlFileSource;
use provisio_core::{Provider, RegistryError, name_key};
use provisio_registry::ProviderRegistry;

/// Prefix for environment overrides, e.g. `PROVISIO_DEFAULT_PROVIDER`.
pub const ENV_PREFIX: &str = "PROVISIO_";

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE: &str = "provisio.toml";

/// Pick the declaration file.
///
/// An explicit path always wins. Otherwise `./provisio.toml` is used if it
/// exists, then `<config dir>/provisio/provisio.toml`, and finally
/// `./provisio.toml` even though it is missing (an empty source).
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    dirs::config_dir()
        .map(|dir| dir.join("provisio").join(CONFIG_FILE))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// Registry over one section of a declaration file.
pub fn open(path: &Path, section: &str) -> ProviderRegistry<dyn Provider> {
    ProviderRegistry::builder()
        .section(section)
        .source(TomlFileSource::new(path, section).with_env_prefix(ENV_PREFIX))
        .build()
}

/// Declared providers in order, the default marked with `*`.
pub fn list(registry: &ProviderRegistry<dyn Provider>) -> Result<String, RegistryError> {
    let declarations = registry.declarations()?;
    let default_key = name_key(&registry.default_name()?);
    let default_index = declarations
        .iter()
        .position(|declaration| name_key(&declaration.name) == default_key);

    let name_width = declarations.iter().map(|d| d.name.len()).max().unwrap_or(0);
    let type_width = declarations
        .iter()
        .map(|d| d.type_identifier.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (index, declaration) in declarations.iter().enumerate() {
        let marker = if Some(index) == default_index { '*' } else { ' ' };
        let keys: Vec<&str> = declaration.parameters.keys().collect();
        let line = format!(
            "{marker} {:<name_width$}  {:<type_width$}  {}",
            declaration.name,
            declaration.type_identifier,
            keys.join(", ")
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Ok(out)
}

/// Summary line for a section that loaded and validated cleanly.
pub fn check(registry: &ProviderRegistry<dyn Provider>) -> Result<String, RegistryError> {
    let count = registry.declarations()?.len();
    let default = registry.default_name()?;
    if !registry.contains(&default)? {
        return Err(RegistryError::ProviderNotFound {
            name: default,
            section: registry.section().to_string(),
        });
    }
    let noun = if count == 1 { "provider" } else { "providers" };
    Ok(format!(
        "ok: {count} {noun} declared in [{}], default `{default}`\n",
        registry.section()
    ))
}

/// Name `get_default` would resolve to.
pub fn default(registry: &ProviderRegistry<dyn Provider>) -> Result<String, RegistryError> {
    Ok(format!("{}\n", registry.default_name()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GREETERS: &str = r#"
[greeters]
default_provider = "spanish"

[[greeters.providers]]
name = "English"
type = "greeting.english"
parameters = { greetname = "John Doe" }

[[greeters.providers]]
name = "Spanish"
type = "greeting.spanish"
parameters = { greetname = "Juan Perez", style = "formal" }

[[greeters.providers]]
name = "French"
type = "greeting.french"
"#;

    fn registry_for(content: &str, section: &str) -> (tempfile::TempDir, ProviderRegistry<dyn Provider>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, content).unwrap();
        let registry = open(&path, section);
        (dir, registry)
    }

    #[test]
    fn list_marks_the_default() {
        let (_dir, registry) = registry_for(GREETERS, "greeters");
        let output = list(&registry).unwrap();
        assert_eq!(
            output,
            "  English  greeting.english  greetname\n\
             * Spanish  greeting.spanish  greetname, style\n\
             \x20 French   greeting.french\n"
        );
    }

    #[test]
    fn check_reports_count_and_default() {
        let (_dir, registry) = registry_for(GREETERS, "greeters");
        assert_eq!(
            check(&registry).unwrap(),
            "ok: 3 providers declared in [greeters], default `Spanish`\n"
        );
    }

    #[test]
    fn check_rejects_invalid_files() {
        let (_dir, registry) = registry_for("[greeters]\ndefalt_provider = \"x\"\n", "greeters");
        assert!(matches!(check(&registry), Err(RegistryError::Source { .. })));
    }

    #[test]
    fn missing_section_is_missing_configuration() {
        let (_dir, registry) = registry_for(GREETERS, "providers");
        match default(&registry) {
            Err(RegistryError::MissingConfiguration { section }) => assert_eq!(section, "providers"),
            other => panic!("expected MissingConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn default_is_first_without_explicit_default() {
        let (_dir, registry) = registry_for(
            "[[providers.providers]]\nname = \"Only\"\ntype = \"x\"\n",
            "providers",
        );
        assert_eq!(default(&registry).unwrap(), "Only\n");
    }

    #[test]
    fn explicit_path_wins() {
        let path = PathBuf::from("/somewhere/else.toml");
        assert_eq!(resolve_config_path(Some(path.clone())), path);
    }
}
