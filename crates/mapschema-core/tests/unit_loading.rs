//! Unit tests for loading mappings and options from disk
//!
//! Covers JSON and YAML documents, JSON-pointer selection of a mapping inside
//! a larger index definition, and the errors surfaced for broken files.

use mapschema_core::{generate, Error, Mapping, Options, SchemaType};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const INDEX_DEFINITION: &str = r#"{
    "settings": {"number_of_shards": 1},
    "mappings": {
        "properties": {
            "title": {"type": "text"},
            "views": {"type": "long"}
        }
    }
}"#;

#[cfg(test)]
mod mapping_files {
    use super::*;

    #[test]
    fn test_mapping_from_pointer() {
        let file = write_temp(".json", INDEX_DEFINITION);
        let mapping = Mapping::from_file(file.path(), Some("/mappings")).unwrap();

        assert_eq!(mapping.node_count(), 3);
        let schemas = generate(&mapping, &Options::default()).unwrap();
        assert_eq!(
            schemas.validation.to_value(),
            json!({"type": "object", "properties": {
                "title": {"type": "string"},
                "views": {"type": "integer"}
            }})
        );
    }

    #[test]
    fn test_whole_index_definition_is_not_a_mapping() {
        let file = write_temp(".json", INDEX_DEFINITION);
        let error = Mapping::from_file(file.path(), None).unwrap_err();
        assert!(matches!(error, Error::InvalidMapping { .. }));
    }

    #[test]
    fn test_missing_pointer() {
        let file = write_temp(".json", INDEX_DEFINITION);
        let error = Mapping::from_file(file.path(), Some("/mappings/_doc")).unwrap_err();
        assert!(matches!(error, Error::PointerNotFound { ref pointer } if pointer == "/mappings/_doc"));
    }

    #[test]
    fn test_yaml_mapping() {
        let file = write_temp(
            ".yml",
            "properties:\n  user:\n    properties:\n      name:\n        type: keyword\n",
        );
        let mapping = Mapping::from_file(file.path(), None).unwrap();
        let schemas = generate(&mapping, &Options::default()).unwrap();

        assert_eq!(
            schemas.sanitization.to_value(),
            json!({"properties": {"user": {"properties": {"name": {}}}}})
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".toml", "type = 'long'");
        let error = Mapping::from_file(file.path(), None).unwrap_err();
        assert!(matches!(error, Error::UnsupportedFormat { .. }));
    }
}

#[cfg(test)]
mod options_files {
    use super::*;

    #[test]
    fn test_yaml_options() {
        let file = write_temp(
            ".yaml",
            r#"
arrayPaths:
  - tags
validation:
  all:
    strict: true
  paths:
    optional:
      - path: tags
        value: true
sanitization:
  all:
    rules: [trim]
    types: [string, object, array]
"#,
        );

        let options = Options::from_file(file.path()).unwrap();
        assert!(options.array_paths.contains("tags"));
        assert!(options.validation.all.strict);
        assert_eq!(options.validation.paths.kind("optional").len(), 1);
        assert_eq!(
            options.sanitization.all.types,
            vec![SchemaType::String, SchemaType::Object, SchemaType::Array]
        );

        let mapping = Mapping::container([("tags", Mapping::leaf("keyword"))]);
        let schemas = generate(&mapping, &options).unwrap();
        assert_eq!(
            schemas.validation.to_value(),
            json!({"type": "object", "strict": true, "properties": {
                "tags": {"type": "array", "optional": true, "items": {"type": "string"}}
            }})
        );
        assert_eq!(
            schemas.sanitization.to_value(),
            json!({"type": "object", "properties": {
                "tags": {"type": "array", "items": {"type": "string"}}
            }})
        );
    }

    #[test]
    fn test_invalid_options_file_reports_violations() {
        let file = write_temp(".json", r#"{"disableWarnings": 1, "validation": {"all": {"minLength": -3}}}"#);
        let error = Options::from_file(file.path()).unwrap_err();

        assert_eq!(error.violations().len(), 2, "{}", error);
        let message = error.to_string();
        assert!(message.contains("/disableWarnings"));
        assert!(message.contains("/validation/all/minLength"));
    }

    #[test]
    fn test_broken_yaml() {
        let file = write_temp(".yaml", "validation: [unclosed");
        let error = Options::from_file(file.path()).unwrap_err();
        assert!(matches!(error, Error::Yaml { .. }));
    }
}
