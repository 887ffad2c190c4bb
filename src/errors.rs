// src/errors.rs

//! Crate-wide error types.
//!
//! - [`ValidationError`]: the single, terminal rule-violation kind.
//! - [`LookupError`]: the "not found" condition of a [`ConfigSource`] lookup.
//! - [`SourceError`]: failures while reading or parsing a config file.
//!
//! [`ConfigSource`]: crate::source::ConfigSource

use std::path::PathBuf;

use thiserror::Error;

/// A violated audit rule.
///
/// `option` is `None` for rules that span more than one section.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub section: String,
    pub option: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(section: &str, option: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            section: section.to_string(),
            option: option.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Why a `(section, option)` lookup came back empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no section: '{0}'")]
    NoSection(String),

    #[error("no option '{option}' in section: '{section}'")]
    NoOption { section: String, option: String },
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported value for {section}:{option}: {reason}")]
    UnsupportedValue {
        section: String,
        option: String,
        reason: String,
    },
}

impl SourceError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        SourceError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Everything that can stop an audit from passing.
#[derive(Error, Debug)]
pub enum ConfcheckError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
