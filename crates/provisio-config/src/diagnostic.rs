// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors and validation failures into rich
//! miette diagnostics with source spans, valid key listings, and "did you
//! mean?" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use provisio_core::suggest;
use thiserror::Error;

/// A configuration error with rich diagnostic information.
///
/// Each variant carries enough context for miette to render an Elm-style
/// error message with source spans, suggestions, and valid key listings.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the declaration file.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(provisio::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(provisio::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A required key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(provisio::config::missing_key),
        help("every provider entry needs `name` and `type`")
    )]
    MissingKey { key: String },

    /// A semantic validation failure.
    #[error("validation error: {message}")]
    #[diagnostic(code(provisio::config::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The declaration file exists but could not be read.
    #[error("failed to read `{path}`")]
    #[diagnostic(code(provisio::config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(provisio::config::other))]
    Other(String),
}

impl ConfigError {
    /// A validation failure without a help line.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }
}

/// Every problem found while loading one declaration section.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid provider declarations in {origin}")]
#[diagnostic(code(provisio::config::invalid))]
pub struct LoadError {
    /// File path, or `<inline>` for in-memory content.
    pub origin: String,
    #[related]
    pub errors: Vec<ConfigError>,
}

impl LoadError {
    pub fn new(origin: impl Into<String>, errors: Vec<ConfigError>) -> Self {
        Self {
            origin: origin.into(),
            errors,
        }
    }
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// `origin` and `content` describe the TOML document the error came from and
/// are used to attach source spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    origin: &str,
    content: &str,
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let suggestion = suggest(field, expected.iter().copied()).map(str::to_string);
                let (span, src) = source_span(origin, content, &path, field);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => {
                let key = path.join(".");
                let (span, src) = match path.split_last() {
                    Some((field, parents)) => source_span(origin, content, parents, field),
                    None => (None, None),
                };
                ConfigError::InvalidType {
                    key,
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(format!("{error}")),
        };

        errors.push(config_error);
    }

    errors
}

fn source_span(
    origin: &str,
    content: &str,
    path: &[String],
    field: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    match find_key_offset(content, path, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(origin, content.to_string())),
        ),
        None => (None, None),
    }
}

/// Find the byte offset of a key in TOML content, relative to a table path.
///
/// For `path = ["greeters", "providers", "1"]` and `field = "nme"`, finds the
/// second `[[greeters.providers]]` header and searches for `nme` after it.
/// Numeric segments select among repeated array-of-tables headers.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let tables: Vec<&str> = path
        .iter()
        .map(String::as_str)
        .filter(|segment| segment.parse::<usize>().is_err())
        .collect();
    let index = path
        .iter()
        .find_map(|segment| segment.parse::<usize>().ok())
        .unwrap_or(0);

    let search_start = if tables.is_empty() {
        0
    } else {
        let dotted = tables.join(".");
        let array_header = format!("[[{dotted}]]");
        let table_header = format!("[{dotted}]");
        content
            .match_indices(&array_header)
            .nth(index)
            .map(|(pos, _)| pos + array_header.len())
            .or_else(|| {
                content
                    .find(&table_header)
                    .map(|pos| pos + table_header.len())
            })?
    };

    let remaining = &content[search_start..];

    let mut byte_offset = 0;
    for line in remaining.lines() {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with(' ') || after.starts_with('=') || after.starts_with('\t'))
        {
            let field_start_in_line = line.len() - trimmed.len();
            return Some(search_start + byte_offset + field_start_in_line);
        }
        byte_offset += line.len() + 1;
    }

    None
}

/// Render any diagnostic to stderr, falling back to its `Display` form.
pub fn render(diagnostic: &dyn Diagnostic) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    if handler.render_report(&mut buf, diagnostic).is_ok() {
        eprint!("{buf}");
    } else {
        eprintln!("Error: {diagnostic}");
    }
}
