//! Generator options
//!
//! Options have two scopes, `validation` and `sanitization`, each split into
//! `all` (defaults for every node of that schema) and `paths` (per-path
//! overrides), plus the top-level `arrayPaths` and `disableWarnings`. Every
//! field is defaulted, so a partial document merges over the defaults.
//!
//! Documents that cross a serialization boundary go through
//! [`Options::from_value`], which checks them against a fixed JSON Schema and
//! reports every violated constraint at once.
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result, Violation};
use crate::loader;
use crate::paths::{ArrayPaths, PathRule, PathRules};
use crate::schema::SchemaType;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Common view over the `all` block of either scope
pub trait ScopeDefaults {
    /// Mark object nodes strict unless a path rule says otherwise
    fn strict(&self) -> bool;

    /// Mark typed nodes optional unless a path rule says otherwise
    fn optional(&self) -> bool;

    /// `minLength` for `string` fields
    fn min_length(&self) -> Option<u64> {
        None
    }

    /// `maxLength` for `string` fields
    fn max_length(&self) -> Option<u64>;

    /// Rule names for `string` fields
    fn rules(&self) -> &[String] {
        &[]
    }

    /// Whether nodes of this type may carry a `type` attribute
    fn admits(&self, schema_type: SchemaType) -> bool;
}

/// Validation defaults applied to every node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidationDefaults {
    pub strict: bool,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl ScopeDefaults for ValidationDefaults {
    fn strict(&self) -> bool {
        self.strict
    }

    fn optional(&self) -> bool {
        self.optional
    }

    fn min_length(&self) -> Option<u64> {
        self.min_length
    }

    fn max_length(&self) -> Option<u64> {
        self.max_length
    }

    fn admits(&self, _schema_type: SchemaType) -> bool {
        true
    }
}

/// Sanitization defaults applied to every node
///
/// `types` is an allowlist: a node only gets a `type` (and so only gets
/// sanitized) when its schema type is listed. The default list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SanitizationDefaults {
    pub strict: bool,
    pub optional: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<SchemaType>,
}

impl ScopeDefaults for SanitizationDefaults {
    fn strict(&self) -> bool {
        self.strict
    }

    fn optional(&self) -> bool {
        self.optional
    }

    fn max_length(&self) -> Option<u64> {
        self.max_length
    }

    fn rules(&self) -> &[String] {
        &self.rules
    }

    fn admits(&self, schema_type: SchemaType) -> bool {
        self.types.contains(&schema_type)
    }
}

/// Validation scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationOptions {
    pub all: ValidationDefaults,
    pub paths: PathRules,
}

/// Sanitization scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizationOptions {
    pub all: SanitizationDefaults,
    pub paths: PathRules,
}

/// Complete generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Suppress unsupported-type warnings
    pub disable_warnings: bool,
    /// Fields to treat as arrays
    pub array_paths: ArrayPaths,
    pub validation: ValidationOptions,
    pub sanitization: SanitizationOptions,
}

impl Options {
    /// Parse and shape-check an options document. Every violated constraint
    /// is reported in the returned `InvalidConfiguration` error.
    pub fn from_value(value: &Value) -> Result<Self> {
        let violations = check_shape(value)?;
        if !violations.is_empty() {
            return Err(Error::invalid_configuration(violations));
        }

        serde_json::from_value(value.clone())
            .map_err(|e| Error::invalid_configuration(vec![Violation::new("", e.to_string())]))
    }

    /// Load options from a JSON or YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let document = loader::load_value(path)?;
        Self::from_value(&document)
    }

    /// Suppress unsupported-type warnings
    pub fn with_warnings_disabled(mut self) -> Self {
        self.disable_warnings = true;
        self
    }

    /// Treat the field at `path` as an array
    pub fn with_array_path(mut self, path: impl Into<String>) -> Self {
        self.array_paths.push(path);
        self
    }

    /// Add a validation path rule
    pub fn with_validation_rule(
        mut self,
        kind: impl Into<String>,
        path: impl Into<String>,
        value: Value,
    ) -> Self {
        self.validation.paths.push(kind, PathRule::new(path, value));
        self
    }

    /// Add a sanitization path rule
    pub fn with_sanitization_rule(
        mut self,
        kind: impl Into<String>,
        path: impl Into<String>,
        value: Value,
    ) -> Self {
        self.sanitization.paths.push(kind, PathRule::new(path, value));
        self
    }

    /// Replace the sanitization type allowlist
    pub fn with_sanitization_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = SchemaType>,
    {
        self.sanitization.all.types = types.into_iter().collect();
        self
    }

    /// Mark every object strict in both schemas
    pub fn with_strict(mut self) -> Self {
        self.validation.all.strict = true;
        self.sanitization.all.strict = true;
        self
    }
}

/// JSON Schema describing a valid options document
pub fn options_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "disableWarnings": {"type": "boolean"},
            "arrayPaths": {
                "type": "array",
                "items": {"type": "string"}
            },
            "validation": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "all": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "strict": {"type": "boolean"},
                            "optional": {"type": "boolean"},
                            "minLength": {"type": "integer", "minimum": 0},
                            "maxLength": {"type": "integer", "minimum": 0}
                        }
                    },
                    "paths": {"$ref": "#/$defs/paths"}
                }
            },
            "sanitization": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "all": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "strict": {"type": "boolean"},
                            "optional": {"type": "boolean"},
                            "rules": {
                                "type": "array",
                                "items": {"type": "string"}
                            },
                            "maxLength": {"type": "integer", "minimum": 0},
                            "types": {
                                "type": "array",
                                "items": {
                                    "enum": ["integer", "string", "number", "boolean", "date", "object", "array"]
                                }
                            }
                        }
                    },
                    "paths": {"$ref": "#/$defs/paths"}
                }
            }
        },
        "$defs": {
            "paths": {
                "type": "object",
                "additionalProperties": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": ["path", "value"],
                        "properties": {
                            "path": {"type": "string"},
                            "value": true
                        }
                    }
                }
            }
        }
    })
}

/// Check a document against [`options_schema`], returning every violation
fn check_shape(value: &Value) -> Result<Vec<Violation>> {
    let schema = options_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| {
        Error::invalid_configuration(vec![Violation::new("", format!("options schema is unusable: {}", e))])
    })?;

    Ok(validator
        .iter_errors(value)
        .map(|e| Violation::new(e.instance_path.to_string(), e.to_string()))
        .collect())
}
