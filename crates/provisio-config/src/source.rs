// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML-backed declaration sources.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;
use provisio_core::{BoxError, DeclarationSet, DeclarationSource};
use tracing::debug;

use crate::diagnostic::{ConfigError, LoadError};
use crate::load_declarations;

/// What the file looked like when it was last loaded successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    exists: bool,
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn read(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => Self {
                exists: true,
                modified: meta.modified().ok(),
                len: meta.len(),
            },
            Err(_) => Self {
                exists: false,
                modified: None,
                len: 0,
            },
        }
    }
}

/// Declarations read from one section of a TOML file.
///
/// A missing file is not an error: it yields no declarations, so the
/// registry falls back. [`has_changed`](DeclarationSource::has_changed)
/// reports a change when the file appears, disappears, or its modification
/// time or length differ from the last successful load.
#[derive(Debug)]
pub struct TomlFileSource {
    path: PathBuf,
    section: String,
    env_prefix: Option<String>,
    stamp: Mutex<Option<FileStamp>>,
}

impl TomlFileSource {
    pub fn new(path: impl Into<PathBuf>, section: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            section: section.into(),
            env_prefix: None,
            stamp: Mutex::new(None),
        }
    }

    /// Let `<prefix>DEFAULT_PROVIDER` override the section's default.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Read and validate the file, reporting every problem found.
    pub fn read(&self) -> Result<DeclarationSet, LoadError> {
        let origin = self.path.display().to_string();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %origin, "declaration file not found, treating as empty");
                String::new()
            }
            Err(source) => {
                return Err(LoadError::new(
                    origin.clone(),
                    vec![ConfigError::Io {
                        path: origin,
                        source,
                    }],
                ));
            }
        };
        load_declarations(&content, &origin, &self.section, self.env_prefix.as_deref())
    }
}

impl DeclarationSource for TomlFileSource {
    fn load(&self) -> Result<DeclarationSet, BoxError> {
        // Stamp before reading so a write racing the read triggers another reload.
        let stamp = FileStamp::read(&self.path);
        let set = self.read()?;
        *self.stamp.lock() = Some(stamp);
        Ok(set)
    }

    fn has_changed(&self) -> bool {
        match *self.stamp.lock() {
            Some(stamp) => stamp != FileStamp::read(&self.path),
            None => true,
        }
    }
}

/// Declarations read from one section of an in-memory TOML document.
#[derive(Debug, Clone)]
pub struct TomlStrSource {
    content: String,
    section: String,
}

impl TomlStrSource {
    pub fn new(content: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            section: section.into(),
        }
    }
}

impl DeclarationSource for TomlStrSource {
    fn load(&self) -> Result<DeclarationSet, BoxError> {
        Ok(load_declarations(&self.content, "<inline>", &self.section, None)?)
    }
}
