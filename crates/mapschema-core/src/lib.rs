//! Mapschema Core - validation and sanitization schemas from field mappings
//!
//! This crate turns a search-index field mapping (a tree of typed field
//! definitions) into two derived schemas:
//! - **Validation schema**: structural and type constraints for rejecting
//!   malformed documents
//! - **Sanitization schema**: coercion and cleanup rules such as trimming,
//!   maximum lengths and default values
//!
//! ## Features
//!
//! - **Type Mapping**: `long`/`short`/`byte` become `integer`, `double`/`float`
//!   become `number`, `text`/`keyword` become `string`
//! - **Path Rules**: per-field overrides addressed by dot paths, with `*`
//!   matching any direct child
//! - **Array Paths**: out-of-band hints for fields the mapping cannot mark as
//!   arrays
//! - **Scope Defaults**: global `strict`, `optional`, length and rule
//!   settings, and a type allowlist for sanitization
//! - **Options Checking**: every violated constraint of an options document
//!   is reported at once
//!
//! ## Quick Start
//!
//! ```rust
//! use mapschema_core::generate_schemas;
//! use serde_json::json;
//!
//! let mapping = json!({
//!     "properties": {
//!         "name": {"type": "keyword"},
//!         "tags": {"type": "string"}
//!     }
//! });
//! let options = json!({
//!     "arrayPaths": ["tags"],
//!     "validation": {"all": {"strict": true}}
//! });
//!
//! let schemas = generate_schemas(&mapping, Some(&options)).unwrap();
//! assert_eq!(
//!     schemas.validation.to_value(),
//!     json!({
//!         "type": "object",
//!         "strict": true,
//!         "properties": {
//!             "name": {"type": "string"},
//!             "tags": {"type": "array", "items": {"type": "string"}}
//!         }
//!     })
//! );
//! ```
//!
//! The transform is pure: no I/O happens outside the [`loader`] helpers, and
//! every call is independent of every other.
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod error;
pub mod generator;
pub mod loader;
pub mod mapping;
pub mod options;
pub mod paths;
pub mod schema;

// Re-export commonly used types for convenience
pub use context::WalkContext;
pub use error::{Error, Result, Violation};
pub use generator::{generate, generate_schemas, GeneratedSchema, SchemaGenerator, SchemaKind};
pub use loader::Format;
pub use mapping::{FieldType, Mapping};
pub use options::{
    options_schema, Options, SanitizationDefaults, SanitizationOptions, ScopeDefaults,
    ValidationDefaults, ValidationOptions,
};
pub use paths::{ArrayPaths, Overrides, PathRule, PathRules};
pub use schema::{OverrideRejection, SchemaNode, SchemaType, Schemas, UnsupportedType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
