//! Error types for mapping-to-schema generation
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for mapschema operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single violated constraint in an options document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON pointer to the offending value (empty for the document root)
    pub path: String,
    /// What was wrong with it
    pub message: String,
}

impl Violation {
    /// Create a new violation
    pub fn new<P, M>(path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "at root: {}", self.message)
        } else {
            write!(f, "at '{}': {}", self.path, self.message)
        }
    }
}

/// Errors produced while loading inputs or generating schemas
#[derive(Debug, Error)]
pub enum Error {
    /// The options document does not conform to the expected shape
    #[error("Invalid configuration:{}", render_violations(.violations))]
    InvalidConfiguration { violations: Vec<Violation> },

    /// The root mapping has neither a `type` nor a `properties` field
    #[error("Invalid mapping: {message}")]
    InvalidMapping { message: String },

    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON file '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML file '{path}': {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Unsupported file extension
    #[error("Unsupported file format for '{path}'. Expected .yaml, .yml, or .json")]
    UnsupportedFormat { path: PathBuf },

    /// A JSON pointer did not resolve inside a loaded document
    #[error("Nothing found at JSON pointer '{pointer}'")]
    PointerNotFound { pointer: String },
}

impl Error {
    /// Create an invalid mapping error
    pub fn invalid_mapping(message: impl Into<String>) -> Self {
        Self::InvalidMapping {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error from a list of violations
    pub fn invalid_configuration(violations: Vec<Violation>) -> Self {
        Self::InvalidConfiguration { violations }
    }

    /// Violations carried by an `InvalidConfiguration` error
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidConfiguration { violations } => violations,
            _ => &[],
        }
    }
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("\n  - {}", violation))
        .collect()
}
