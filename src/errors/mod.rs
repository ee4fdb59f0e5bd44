// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Error types with actionable messages
//!
//! Every fatal condition carries a diagnostic code so operators can tell the
//! error kind apart at a glance, and configuration problems are reported all
//! at once rather than one per run.

mod recovery;

pub use recovery::{closest_match, RecoverySuggestion};

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for policygen operations
pub type PolicygenResult<T> = Result<T, PolicygenError>;

/// Main error type for policygen
#[derive(Error, Debug, Diagnostic)]
pub enum PolicygenError {
    // ─────────────────────────────────────────────────────────────────────────
    // Catalog Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Unknown compliance standard '{standard}'")]
    #[diagnostic(
        code(policygen::unknown_standard),
        help("Available standards: {available}")
    )]
    UnknownStandard { standard: String, available: String },

    #[error("Standard '{standard}' has no rule named '{key}'")]
    #[diagnostic(code(policygen::unknown_rule_key))]
    UnknownRuleKey {
        standard: String,
        key: String,
        #[help]
        help: Option<String>,
    },

    #[error("Rule '{key}' has no fragment for platform '{platform}'")]
    #[diagnostic(
        code(policygen::unsupported_platform),
        help("Supported platforms for this rule: {supported}")
    )]
    UnsupportedPlatform {
        key: String,
        platform: String,
        supported: String,
    },

    #[error("Built-in rule catalog is malformed")]
    #[diagnostic(code(policygen::invalid_catalog))]
    InvalidCatalog { problems: Vec<String> },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to parse configuration '{path}': {message}")]
    #[diagnostic(code(policygen::config_parse))]
    ConfigParse {
        path: PathBuf,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration '{path}' has {} invalid setting(s)", .issues.len())]
    #[diagnostic(
        code(policygen::config_type),
        help("Fix every listed setting; run 'policygen rules -c <standard>' to see expected types")
    )]
    ConfigType {
        path: PathBuf,
        #[related]
        issues: Vec<ConfigIssue>,
    },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(policygen::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("No rule of '{standard}' supports platform '{platform}'; nothing to render")]
    #[diagnostic(
        code(policygen::empty_document),
        help("Run 'policygen standards' to see which platforms each standard supports")
    )]
    EmptyDocument {
        standard: String,
        platform: String,
        skipped: usize,
    },

    #[error("Template error in rule '{key}': {message}")]
    #[diagnostic(code(policygen::template))]
    Template { key: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Output Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to write '{path}': {error}")]
    #[diagnostic(code(policygen::write_error))]
    WriteError {
        path: PathBuf,
        error: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(policygen::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(policygen::json_error))]
    Json { message: String },
}

/// A single problem with one configuration key
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("'{key}': expected {expected}, found {found}")]
    #[diagnostic(code(policygen::config_type::mismatch))]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("'{key}': {value} is outside the allowed range {min}..={max}")]
    #[diagnostic(code(policygen::config_type::out_of_range))]
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("'{key}': '{value}' is not one of [{allowed}]")]
    #[diagnostic(code(policygen::config_type::not_allowed))]
    NotAllowed {
        key: String,
        value: String,
        allowed: String,
    },

    #[error("'{key}': text values must not contain control characters")]
    #[diagnostic(code(policygen::config_type::control_character))]
    ControlCharacter { key: String },

    #[error("'{key}' is set more than once ({first} and {second})")]
    #[diagnostic(code(policygen::config_type::duplicate))]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },
}

impl ConfigIssue {
    /// The rule key this issue is about
    pub fn key(&self) -> &str {
        match self {
            Self::TypeMismatch { key, .. }
            | Self::OutOfRange { key, .. }
            | Self::NotAllowed { key, .. }
            | Self::ControlCharacter { key }
            | Self::DuplicateKey { key, .. } => key,
        }
    }
}

impl From<serde_yaml::Error> for PolicygenError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for PolicygenError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl PolicygenError {
    /// Create an unknown-key error, suggesting the closest known key
    pub fn unknown_rule_key<'a>(
        standard: &str,
        key: &str,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let help = closest_match(key, known).map(|k| format!("Did you mean '{}'?", k));
        Self::UnknownRuleKey {
            standard: standard.to_string(),
            key: key.to_string(),
            help,
        }
    }

    /// Create a parse error, pointing at the YAML location when known
    pub fn config_parse(path: impl Into<PathBuf>, error: &serde_yaml::Error) -> Self {
        let suggestion = RecoverySuggestion::fix_yaml_syntax(
            error.location().map(|l| l.line()),
            error.location().map(|l| l.column()),
        );
        Self::ConfigParse {
            path: path.into(),
            message: error.to_string(),
            help: Some(suggestion.action),
        }
    }

    /// Create a write error with context on the likely cause
    pub fn write_failed(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let help = match error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                Some("The destination directory is not writable by the current user".to_string())
            }
            std::io::ErrorKind::NotFound => {
                Some("Create the destination directory first".to_string())
            }
            _ => None,
        };
        Self::WriteError {
            path: path.into(),
            error: error.to_string(),
            help,
        }
    }

    /// Keys named by this error, for reporting
    pub fn offending_keys(&self) -> Vec<&str> {
        match self {
            Self::UnknownRuleKey { key, .. } | Self::UnsupportedPlatform { key, .. } => {
                vec![key.as_str()]
            }
            Self::Template { key, .. } => vec![key.as_str()],
            Self::ConfigType { issues, .. } => issues.iter().map(ConfigIssue::key).collect(),
            _ => vec![],
        }
    }
}
