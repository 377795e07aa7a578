//! Generated schema trees, the output side of the transform
//!
//! The serialized form is the declarative shape consumed by a document
//! validator/sanitizer: `type`, `optional`, `strict`, `minLength`,
//! `maxLength`, `rules`, `properties` and `items`, plus any custom keys
//! injected by path rules.
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Target schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Integer,
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
}

impl SchemaType {
    /// Every schema type, handy for a permissive sanitization allowlist
    pub const ALL: [SchemaType; 7] = [
        SchemaType::Object,
        SchemaType::String,
        SchemaType::Integer,
        SchemaType::Number,
        SchemaType::Array,
        SchemaType::Boolean,
        SchemaType::Date,
    ];

    /// Name as written in a schema
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Parse a schema type name
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One node of a generated schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub strict: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    /// Custom keys injected by path rules
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why a path-rule override could not be applied to a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideRejection {
    /// The key names structure produced by the walk itself
    Reserved,
    /// The value does not fit the attribute the key names
    WrongShape,
}

impl SchemaNode {
    /// A node carrying only a type
    pub fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Merge a path-rule override onto this node. Keys naming a known
    /// attribute are parsed into it; any other key is stored verbatim.
    pub fn apply_override(&mut self, key: &str, value: &Value) -> Result<(), OverrideRejection> {
        match key {
            "properties" | "items" => Err(OverrideRejection::Reserved),
            "type" => {
                let parsed = value.as_str().and_then(SchemaType::parse);
                self.schema_type = Some(parsed.ok_or(OverrideRejection::WrongShape)?);
                Ok(())
            }
            "minLength" => {
                self.min_length = Some(value.as_u64().ok_or(OverrideRejection::WrongShape)?);
                Ok(())
            }
            "maxLength" => {
                self.max_length = Some(value.as_u64().ok_or(OverrideRejection::WrongShape)?);
                Ok(())
            }
            "rules" => {
                self.rules = Some(
                    serde_json::from_value(value.clone())
                        .map_err(|_| OverrideRejection::WrongShape)?,
                );
                Ok(())
            }
            "optional" | "strict" => {
                let flag = value.as_bool().ok_or(OverrideRejection::WrongShape)?;
                if key == "optional" {
                    self.optional = flag;
                } else {
                    self.strict = flag;
                }
                Ok(())
            }
            _ => {
                self.extra.insert(key.to_string(), value.clone());
                Ok(())
            }
        }
    }

    /// Whether the node carries no attribute at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Number of nodes in this subtree, counting array items
    pub fn node_count(&self) -> usize {
        let children: usize = self
            .properties
            .iter()
            .flat_map(|properties| properties.values())
            .map(SchemaNode::node_count)
            .sum();
        let items = self.items.as_ref().map(|items| items.node_count()).unwrap_or(0);
        1 + children + items
    }

    /// Render as a JSON value
    pub fn to_value(&self) -> Value {
        // Field names are strings and every leaf is plain data
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Warning raised for a mapping field whose type has no schema counterpart
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnsupportedType {
    /// Location of the field, e.g. `$.customer.location`
    pub path: String,
    /// The offending type, `None` when the field had no type at all
    pub field_type: Option<String>,
}

impl fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field_type {
            Some(field_type) => write!(
                f,
                "mapping type: {} at '{}' is unsupported and will be ignored",
                field_type, self.path
            ),
            None => write!(f, "mapping at '{}' has no type and will be ignored", self.path),
        }
    }
}

/// The two schemas derived from one mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schemas {
    pub validation: SchemaNode,
    pub sanitization: SchemaNode,
    /// Unsupported field types met during generation; empty when warnings
    /// are disabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<UnsupportedType>,
}
