//! Shared utilities for command handlers

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::output::OutputFormatter;
use mapschema_core::{Format, Options};
use serde::Serialize;
use std::path::Path;

/// Fail early with a friendly error when an input file is missing
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Load an options file, or the defaults when there is none
pub fn load_options(path: Option<&Path>) -> Result<Options> {
    match path {
        Some(path) => {
            ensure_exists(path)?;
            tracing::debug!(path = %path.display(), "Loading options");
            Ok(Options::from_file(path)?)
        }
        None => {
            tracing::debug!("No options file, using defaults");
            Ok(Options::default())
        }
    }
}

/// Format used when writing a document to `path`. A `.yaml`/`.yml` file is
/// always YAML; otherwise the requested machine format is kept and human
/// output becomes indented JSON.
pub fn file_format(path: &Path, requested: OutputFormat) -> OutputFormat {
    match (Format::from_path(path), requested) {
        (Ok(Format::Yaml), _) => OutputFormat::Yaml,
        (Ok(Format::Json), OutputFormat::Json) => OutputFormat::Json,
        (Ok(Format::Json), _) => OutputFormat::JsonPretty,
        (Err(_), OutputFormat::Human) => OutputFormat::JsonPretty,
        (Err(_), format) => format,
    }
}

/// Serialize `value` into `path`
pub fn save_document<T: Serialize>(path: &Path, value: &T, requested: OutputFormat) -> Result<()> {
    let mut content = file_format(path, requested).format(value)?;
    if !content.ends_with('\n') {
        content.push('\n');
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;

    tracing::debug!(path = %path.display(), "Saved document");
    Ok(())
}
