//! The mapping-to-schema walk
//!
//! One walk produces one schema. At every node the generator resolves the
//! node's schema type, decides whether it is a leaf, an object or an array
//! (arrays are only known from `arrayPaths`, never inferred from shape),
//! applies scope defaults and path-rule overrides, and descends into child
//! properties with freshly narrowed rules and array paths.
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

use crate::context::WalkContext;
use crate::error::{Error, Result};
use crate::mapping::Mapping;
use crate::options::{Options, ScopeDefaults};
use crate::paths::PathRules;
use crate::schema::{SchemaNode, SchemaType, Schemas, UnsupportedType};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Which of the two schemas a walk produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Structural and type constraints
    Validation,
    /// Coercion and cleanup rules
    Sanitization,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Validation => f.write_str("validation"),
            SchemaKind::Sanitization => f.write_str("sanitization"),
        }
    }
}

/// Result of a single walk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedSchema {
    pub schema: SchemaNode,
    /// Unsupported field types met on the way, in visiting order
    pub warnings: Vec<UnsupportedType>,
}

/// Walks a mapping to produce one kind of schema
#[derive(Debug, Clone, Copy)]
pub struct SchemaGenerator<'a> {
    options: &'a Options,
    kind: SchemaKind,
}

impl<'a> SchemaGenerator<'a> {
    /// Create a generator for the given schema kind
    pub fn new(options: &'a Options, kind: SchemaKind) -> Self {
        Self { options, kind }
    }

    /// The schema kind this generator produces
    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    fn defaults(&self) -> &'a dyn ScopeDefaults {
        match self.kind {
            SchemaKind::Validation => &self.options.validation.all,
            SchemaKind::Sanitization => &self.options.sanitization.all,
        }
    }

    fn rules(&self) -> &'a PathRules {
        match self.kind {
            SchemaKind::Validation => &self.options.validation.paths,
            SchemaKind::Sanitization => &self.options.sanitization.paths,
        }
    }

    fn admit(&self, schema_type: Option<SchemaType>) -> Option<SchemaType> {
        schema_type.filter(|t| self.defaults().admits(*t))
    }

    /// Walk `mapping` from its root
    pub fn generate(&self, mapping: &Mapping) -> GeneratedSchema {
        let context = WalkContext::root(self.rules().clone(), self.options.array_paths.clone());
        let mut warnings = Vec::new();
        let schema = self.visit(mapping, &context, &mut warnings);

        tracing::debug!(
            kind = %self.kind,
            nodes = schema.node_count(),
            unsupported = warnings.len(),
            "Generated schema"
        );

        GeneratedSchema { schema, warnings }
    }

    fn visit(
        &self,
        mapping: &Mapping,
        context: &WalkContext,
        warnings: &mut Vec<UnsupportedType>,
    ) -> SchemaNode {
        tracing::trace!(
            kind = %self.kind,
            path = %context.path,
            is_array = context.is_array,
            "Visiting mapping node"
        );

        let defaults = self.defaults();
        let optional = context.overrides.optional().unwrap_or_else(|| defaults.optional());
        let strict = context.overrides.strict().unwrap_or_else(|| defaults.strict());

        let mut node = if mapping.is_object() {
            self.object_node(mapping, context, strict, warnings)
        } else {
            self.leaf_node(mapping, context, warnings)
        };

        // Only typed nodes can be optional
        if optional && node.schema_type.is_some() {
            node.optional = true;
        }

        self.apply_overrides(&mut node, context);
        node
    }

    fn object_node(
        &self,
        mapping: &Mapping,
        context: &WalkContext,
        strict: bool,
        warnings: &mut Vec<UnsupportedType>,
    ) -> SchemaNode {
        let properties = self.visit_properties(mapping, context, warnings);
        let object = SchemaNode {
            schema_type: self.admit(Some(SchemaType::Object)),
            strict,
            properties,
            ..SchemaNode::default()
        };

        if context.is_array {
            SchemaNode {
                schema_type: self.admit(Some(SchemaType::Array)),
                items: Some(Box::new(object)),
                ..SchemaNode::default()
            }
        } else {
            object
        }
    }

    fn leaf_node(
        &self,
        mapping: &Mapping,
        context: &WalkContext,
        warnings: &mut Vec<UnsupportedType>,
    ) -> SchemaNode {
        let scalar = mapping.parsed_type().map(|t| t.schema_type());
        if scalar.is_none() {
            warnings.push(UnsupportedType {
                path: context.path.clone(),
                field_type: mapping.field_type.clone(),
            });
        }

        if context.is_array {
            return SchemaNode {
                schema_type: self.admit(scalar.map(|_| SchemaType::Array)),
                items: Some(Box::new(SchemaNode {
                    schema_type: self.admit(scalar),
                    ..SchemaNode::default()
                })),
                ..SchemaNode::default()
            };
        }

        let mut node = SchemaNode {
            schema_type: self.admit(scalar),
            ..SchemaNode::default()
        };
        if mapping.is_string() {
            self.apply_string_defaults(&mut node);
        }
        node
    }

    /// Length limits and rules for `string` fields. Keyed off the mapping
    /// type, so they apply even when the allowlist withheld the `type`.
    fn apply_string_defaults(&self, node: &mut SchemaNode) {
        let defaults = self.defaults();
        node.min_length = defaults.min_length();
        node.max_length = defaults.max_length();

        let rules = defaults.rules();
        if !rules.is_empty() {
            node.rules = Some(rules.to_vec());
        }
    }

    /// Child schemas, or `None` when there are no children
    fn visit_properties(
        &self,
        mapping: &Mapping,
        context: &WalkContext,
        warnings: &mut Vec<UnsupportedType>,
    ) -> Option<BTreeMap<String, SchemaNode>> {
        let properties: BTreeMap<String, SchemaNode> = mapping
            .properties
            .iter()
            .flatten()
            .map(|(name, child)| {
                let child_context = context.child(name);
                (name.clone(), self.visit(child, &child_context, warnings))
            })
            .collect();

        (!properties.is_empty()).then_some(properties)
    }

    /// Merge custom path-rule overrides. On an array the wrapper only carries
    /// `optional`; everything else belongs to the item schema.
    fn apply_overrides(&self, node: &mut SchemaNode, context: &WalkContext) {
        let target = if context.is_array {
            node.items.as_deref_mut()
        } else {
            Some(node)
        };
        let Some(target) = target else {
            return;
        };

        for (key, value) in context.overrides.custom() {
            if let Err(rejection) = target.apply_override(key, value) {
                if !self.options.disable_warnings {
                    tracing::warn!(
                        kind = %self.kind,
                        path = %context.path,
                        key,
                        ?rejection,
                        "Ignoring path rule override"
                    );
                }
            }
        }
    }
}

/// Generate both schemas for a typed mapping
///
/// # Examples
///
/// ```rust
/// use mapschema_core::{generate, Mapping, Options};
/// use serde_json::json;
///
/// let mapping = Mapping::container([("a", Mapping::leaf("long"))]);
/// let schemas = generate(&mapping, &Options::default()).unwrap();
///
/// assert_eq!(
///     schemas.validation.to_value(),
///     json!({"type": "object", "properties": {"a": {"type": "integer"}}})
/// );
/// assert_eq!(schemas.sanitization.to_value(), json!({"properties": {"a": {}}}));
/// ```
pub fn generate(mapping: &Mapping, options: &Options) -> Result<Schemas> {
    if !mapping.is_rooted() {
        return Err(Error::invalid_mapping(
            "mapping must have 'type' or 'properties' field",
        ));
    }

    let validation = SchemaGenerator::new(options, SchemaKind::Validation).generate(mapping);
    let sanitization = SchemaGenerator::new(options, SchemaKind::Sanitization).generate(mapping);

    let warnings = if options.disable_warnings {
        Vec::new()
    } else {
        // Both walks visit the same nodes, so each field is reported once
        let unique: BTreeSet<UnsupportedType> = validation
            .warnings
            .into_iter()
            .chain(sanitization.warnings)
            .collect();
        for warning in &unique {
            tracing::warn!(path = %warning.path, "{}", warning);
        }
        unique.into_iter().collect()
    };

    Ok(Schemas {
        validation: validation.schema,
        sanitization: sanitization.schema,
        warnings,
    })
}

/// Generate both schemas from untyped documents
///
/// The options document, when given, is shape-checked first; a `null`
/// document means default options. The mapping must then satisfy the root
/// contract.
///
/// # Examples
///
/// ```rust
/// use mapschema_core::generate_schemas;
/// use serde_json::json;
///
/// let schemas = generate_schemas(
///     &json!({"properties": {"a": {"type": "string"}}}),
///     Some(&json!({"arrayPaths": ["a"]})),
/// )
/// .unwrap();
///
/// assert_eq!(
///     schemas.validation.to_value(),
///     json!({
///         "type": "object",
///         "properties": {"a": {"type": "array", "items": {"type": "string"}}}
///     })
/// );
/// ```
pub fn generate_schemas(mapping: &Value, options: Option<&Value>) -> Result<Schemas> {
    let options = match options {
        None | Some(Value::Null) => Options::default(),
        Some(document) => Options::from_value(document)?,
    };
    let mapping = Mapping::from_value(mapping)?;
    generate(&mapping, &options)
}
