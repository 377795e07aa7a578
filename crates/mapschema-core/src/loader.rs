//! Reading mapping and options documents from JSON or YAML files
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse document content in this format
    pub fn parse(&self, content: &str, path: &Path) -> Result<Value> {
        match self {
            Format::Yaml => {
                // Parse as YAML first so YAML-specific errors surface as such
                let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|source| Error::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::to_value(yaml).map_err(|source| Error::Json {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Format::Json => serde_json::from_str(content).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Read and parse a document, detecting the format from the extension
pub fn load_value(path: &Path) -> Result<Value> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), ?format, bytes = content.len(), "Loaded document");
    format.parse(&content, path)
}

/// Select a sub-document by JSON pointer; the whole document when `None`
pub fn select<'a>(document: &'a Value, pointer: Option<&str>) -> Result<&'a Value> {
    match pointer {
        None | Some("") => Ok(document),
        Some(pointer) => document.pointer(pointer).ok_or_else(|| Error::PointerNotFound {
            pointer: pointer.to_string(),
        }),
    }
}
