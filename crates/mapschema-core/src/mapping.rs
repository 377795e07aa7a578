//! Search-index field mappings, the input side of the transform
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::loader;
use crate::schema::SchemaType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Field types understood by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Long,
    Short,
    Byte,
    Number,
    Double,
    Float,
    String,
    Text,
    Keyword,
    Boolean,
    Date,
    Object,
    Nested,
}

impl FieldType {
    /// Parse a mapping `type` value; `None` for anything unsupported
    pub fn parse(value: &str) -> Option<Self> {
        let field_type = match value {
            "integer" => Self::Integer,
            "long" => Self::Long,
            "short" => Self::Short,
            "byte" => Self::Byte,
            "number" => Self::Number,
            "double" => Self::Double,
            "float" => Self::Float,
            "string" => Self::String,
            "text" => Self::Text,
            "keyword" => Self::Keyword,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "object" => Self::Object,
            "nested" => Self::Nested,
            _ => return None,
        };
        Some(field_type)
    }

    /// Name as written in a mapping
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Short => "short",
            Self::Byte => "byte",
            Self::Number => "number",
            Self::Double => "double",
            Self::Float => "float",
            Self::String => "string",
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Object => "object",
            Self::Nested => "nested",
        }
    }

    /// Schema type for a single (non-array) value of this field type
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Integer | Self::Long | Self::Short | Self::Byte => SchemaType::Integer,
            Self::Number | Self::Double | Self::Float => SchemaType::Number,
            Self::String | Self::Text | Self::Keyword => SchemaType::String,
            Self::Boolean => SchemaType::Boolean,
            Self::Date => SchemaType::Date,
            Self::Object | Self::Nested => SchemaType::Object,
        }
    }

    /// Whether the field holds sub-properties
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object | Self::Nested)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a field mapping tree
///
/// Mapping parameters the generator does not interpret (`index`, `analyzer`,
/// `fields`, `_all`, `include_in_parent`, ...) are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    /// Field type as written in the mapping
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    /// Child fields, by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Mapping>>,

    /// Everything else
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mapping {
    /// A leaf field of the given type
    pub fn leaf(field_type: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..Self::default()
        }
    }

    /// An untyped container of child fields
    pub fn container<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Mapping)>,
        K: Into<String>,
    {
        Self {
            properties: Some(properties.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            ..Self::default()
        }
    }

    /// Set the field type
    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    /// Parse a mapping document, enforcing the root contract: the root must
    /// carry a string `type` or an object `properties`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let has_type = value.get("type").map(Value::is_string).unwrap_or(false);
        let has_properties = value.get("properties").map(Value::is_object).unwrap_or(false);

        if !has_type && !has_properties {
            return Err(Error::invalid_mapping(
                "mapping must have 'type' or 'properties' field",
            ));
        }

        serde_json::from_value(value.clone()).map_err(|e| Error::invalid_mapping(e.to_string()))
    }

    /// Load a mapping from a JSON or YAML file, optionally selecting a
    /// sub-document with a JSON pointer (e.g. `/mappings/_doc`)
    pub fn from_file(path: &Path, pointer: Option<&str>) -> Result<Self> {
        let document = loader::load_value(path)?;
        let value = loader::select(&document, pointer)?;
        Self::from_value(value)
    }

    /// Whether this node satisfies the root contract
    pub fn is_rooted(&self) -> bool {
        self.field_type.is_some() || self.properties.is_some()
    }

    /// Parsed field type, if present and supported
    pub fn parsed_type(&self) -> Option<FieldType> {
        self.field_type.as_deref().and_then(FieldType::parse)
    }

    /// Whether the node is object-shaped: it has child properties or an
    /// `object`/`nested` type
    pub fn is_object(&self) -> bool {
        self.properties.is_some() || self.parsed_type().map(|t| t.is_object()).unwrap_or(false)
    }

    /// Whether the mapping type is literally `string`
    pub fn is_string(&self) -> bool {
        self.field_type.as_deref() == Some("string")
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self
            .properties
            .iter()
            .flat_map(|properties| properties.values())
            .map(Mapping::node_count)
            .sum::<usize>()
    }
}
