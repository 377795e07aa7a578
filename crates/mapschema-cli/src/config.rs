//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Command-line arguments, which win over both

use crate::cli::{OutputFormat, SchemaSelection};
use crate::error::{Error, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Defaults for the generate command
    pub generate: GenerateConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log format used when `MAPSCHEMA_LOG_FORMAT` is not set
    pub format: LogFormat,
}

/// Defaults for `mapschema generate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Options file applied when `--options` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<PathBuf>,

    /// Schema selection when `--schema` is not given
    pub schema: SchemaSelection,

    /// Suppress unsupported-type warnings
    pub disable_warnings: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
        }
    }
}

/// Config file encodings, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigEncoding {
    Toml,
    Yaml,
    Json,
}

impl ConfigEncoding {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::config(format!(
                "Unsupported config file '{}'. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match ConfigEncoding::from_path(path)? {
            ConfigEncoding::Toml => toml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?,
            ConfigEncoding::Yaml => serde_yaml::from_str(&content)?,
            ConfigEncoding::Json => serde_json::from_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// User-level configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mapschema").join("config.toml"))
    }

    /// Configuration file paths searched in order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".mapschema.toml"),
            PathBuf::from(".mapschema.yaml"),
            PathBuf::from(".mapschema.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let dir = config_dir.join("mapschema");
            paths.push(dir.join("config.toml"));
            paths.push(dir.join("config.yaml"));
            paths.push(dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".mapschema.toml"));
        }

        paths
    }

    /// Serialize in the encoding implied by the file extension
    pub fn render(&self, path: &Path) -> Result<String> {
        match ConfigEncoding::from_path(path)? {
            ConfigEncoding::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
            ConfigEncoding::Yaml => Ok(serde_yaml::to_string(self)?),
            ConfigEncoding::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_toml_merges_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generate]\nschema = \"validation\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.generate.schema, SchemaSelection::Validation);
        assert_eq!(config.output, OutputConfig::default());
        assert!(config.generate.options.is_none());
    }

    #[test]
    fn test_save_and_reload_each_encoding() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.format = OutputFormat::Yaml;
        config.generate.options = Some(PathBuf::from("options.json"));
        config.logging.format = LogFormat::Json;

        for name in ["nested/config.toml", "config.yaml", "config.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config, "{}", name);
        }
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(Config::from_file(&missing), Err(Error::FileNotFound { .. })));

        let ini = dir.path().join("config.ini");
        std::fs::write(&ini, "x=1").unwrap();
        assert!(matches!(Config::from_file(&ini), Err(Error::Config(_))));
    }
}
