// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Deserialization failures become miette diagnostics that point at the
//! offending key inside `questlog.toml` and offer the closest valid key as a
//! correction.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::fmt::Write as _;

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a valid key must beat to be offered as a correction.
/// Catches `prot` -> `port` and `databse_path` -> `database_path`.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, renderable as a miette report.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that its table does not declare.
    #[error("unknown key `{key}` in {}", table_label(.section))]
    #[diagnostic(
        code(questlog::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Dotted table path, empty for the top level.
        section: String,
        suggestion: Option<String>,
        valid_keys: Vec<String>,
        #[label("unrecognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value whose TOML type does not fit the field.
    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(
        code(questlog::config::invalid_type),
        help("`{key}` expects {expected}")
    )]
    InvalidType {
        /// Dotted path of the field.
        key: String,
        found: String,
        expected: String,
        #[label("this value")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` is required")]
    #[diagnostic(
        code(questlog::config::missing_key),
        help("set `{key}` in questlog.toml or through its QUESTLOG_ environment variable")
    )]
    MissingKey { key: String },

    /// A value that deserialized but breaks a semantic rule.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(questlog::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(questlog::config::other))]
    Other(String),
}

fn table_label(section: &str) -> String {
    if section.is_empty() {
        "the top level".to_string()
    } else {
        format!("[{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &[String]) -> String {
    let valid = valid_keys.join(", ");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? (expected one of: {valid})"),
        None => format!("expected one of: {valid}"),
    }
}

/// Converts every failure carried by a `figment::Error` into a `ConfigError`.
///
/// `toml_sources` pairs each candidate file name with its content. Unknown
/// keys and mistyped values get a source span when their file is listed.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let (span, src) = locate(error, &error.path, field, toml_sources).unzip();
            ConfigError::UnknownKey {
                key: field.clone(),
                section: error.path.join("."),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.iter().map(|k| k.to_string()).collect(),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: dotted(&error.path, field),
        },
        Kind::InvalidType(actual, expected) => match error.path.split_last() {
            Some((field, section)) => {
                let (span, src) = locate(error, section, field, toml_sources).unzip();
                ConfigError::InvalidType {
                    key: dotted(section, field),
                    found: actual.to_string(),
                    expected: expected.clone(),
                    span,
                    src,
                }
            }
            None => ConfigError::Other(error.to_string()),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

fn dotted(section: &[String], field: &str) -> String {
    let mut key = section.join(".");
    if !key.is_empty() && !field.is_empty() {
        key.push('.');
    }
    key.push_str(field);
    key
}

/// Resolves the file an error came from and the span of `field` within it.
///
/// Errors from an inline string carry no file path and resolve against the
/// sole source when exactly one is given.
fn locate(
    error: &figment::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let origin = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => Some(path.display().to_string()),
        _ => None,
    };
    let (name, content) = match origin {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path)?,
        None if toml_sources.len() == 1 => toml_sources.first()?,
        None => return None,
    };

    let offset = find_key_offset(content, section, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `field` as a key of the TOML table `section`.
///
/// The scan tracks the current table header, so a key of the same name in a
/// different table never matches. An empty `section` is the top level.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let wanted = section.join(".");
    let mut table = String::new();
    let mut line_start = 0;

    for line in content.split_inclusive('\n') {
        let start = line_start;
        line_start += line.len();

        let body = line.trim();
        if let Some(header) = table_header(body) {
            table = header;
            continue;
        }
        if table == wanted && key_of(body) == Some(field) {
            return Some(start + (line.len() - line.trim_start().len()));
        }
    }

    None
}

/// `[server]` and `[[server]]` both yield `server`.
fn table_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?.trim_start_matches('[');
    let (name, _) = inner.split_once(']')?;
    Some(name.trim().to_string())
}

fn key_of(line: &str) -> Option<&str> {
    line.split_once('=').map(|(key, _)| key.trim())
}

/// Picks the valid key most similar to `unknown`, if any clears the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints each error to stderr as a graphical miette report.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_reports(errors));
}

fn render_reports(errors: &[ConfigError]) -> String {
    let handler = GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error) {
            Ok(()) => out.push_str(&report),
            Err(_) => {
                let _ = writeln!(out, "Error: {error}");
            }
        }
    }
    out
}
