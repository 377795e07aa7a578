//! Schema generation command handler

use super::utils;
use crate::cli::{GenerateArgs, SchemaSelection};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use mapschema_core::{Mapping, Schemas};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, Level};

/// Handle the generate command
#[instrument(skip(args, config, output), fields(mapping = %args.mapping.display()))]
pub fn handle_generate(args: GenerateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("generate_command", &format!("mapping: {}", args.mapping.display()));

    if let Some(pointer) = args.pointer.as_deref() {
        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(Error::invalid_args(format!(
                "--pointer must be a JSON pointer starting with '/', got '{}'",
                pointer
            )));
        }
    }

    utils::ensure_exists(&args.mapping)?;
    output.info(&format!("Reading mapping: {}", args.mapping.display()))?;

    let options_path = args.options.as_deref().or(config.generate.options.as_deref());
    let mut options = utils::load_options(options_path)?;
    if args.no_warnings || config.generate.disable_warnings {
        options.disable_warnings = true;
    }

    let mapping = Mapping::from_file(&args.mapping, args.pointer.as_deref())?;
    debug!(fields = mapping.node_count(), "Mapping loaded");

    let schemas = mapschema_core::generate(&mapping, &options)?;
    let selection = args.schema.unwrap_or(config.generate.schema);
    info!(
        ?selection,
        warnings = schemas.warnings.len(),
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Schemas generated"
    );

    match &args.save_to {
        Some(path) => {
            utils::save_document(path, &select(&schemas, selection), output.format())?;
            output.success(&format!("✓ Schemas written to {}", path.display()))?;
        }
        None => write_schemas(output, &schemas, selection)?,
    }

    report_unsupported(output, &schemas)
}

/// Unsupported types already reach stderr when warn-level logging is on
fn report_unsupported(output: &mut OutputWriter, schemas: &Schemas) -> Result<()> {
    if tracing::enabled!(Level::WARN) {
        return Ok(());
    }
    output.unsupported_types(&schemas.warnings)
}

/// The document emitted for a selection
pub fn select(schemas: &Schemas, selection: SchemaSelection) -> Value {
    match selection {
        SchemaSelection::Validation => schemas.validation.to_value(),
        SchemaSelection::Sanitization => schemas.sanitization.to_value(),
        SchemaSelection::Both => json!({
            "validation": schemas.validation.to_value(),
            "sanitization": schemas.sanitization.to_value(),
        }),
    }
}

fn write_schemas(output: &mut OutputWriter, schemas: &Schemas, selection: SchemaSelection) -> Result<()> {
    if !output.is_human() {
        return output.data(&select(schemas, selection));
    }

    if selection != SchemaSelection::Sanitization {
        output.section("Validation Schema")?;
        output.data(&schemas.validation)?;
    }
    if selection != SchemaSelection::Validation {
        output.section("Sanitization Schema")?;
        output.data(&schemas.sanitization)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::cell::RefCell;
    use std::io::Write;
    use std::path::PathBuf;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    const MAPPING: &str = r#"{
        "mappings": {
            "properties": {
                "name": {"type": "string"},
                "location": {"type": "geo_point"},
                "tags": {"type": "keyword"}
            }
        }
    }"#;

    fn args(dir: &TempDir) -> GenerateArgs {
        let mapping = dir.path().join("mapping.json");
        std::fs::write(&mapping, MAPPING).unwrap();
        GenerateArgs {
            mapping,
            options: None,
            pointer: Some("/mappings".to_string()),
            schema: None,
            no_warnings: false,
            save_to: None,
        }
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, true, Box::new(std::io::sink()))
    }

    #[test]
    fn test_generate_saves_both_schemas() {
        let dir = TempDir::new().unwrap();
        let options = dir.path().join("options.yaml");
        std::fs::write(&options, "arrayPaths: [tags]\nsanitization:\n  all:\n    rules: [trim]\n").unwrap();

        let mut args = args(&dir);
        args.options = Some(options);
        args.save_to = Some(dir.path().join("out/schemas.json"));
        let save_to = args.save_to.clone().unwrap();

        handle_generate(args, &Config::default(), &mut quiet_output()).unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(save_to).unwrap()).unwrap();
        assert_eq!(
            saved,
            json!({
                "validation": {"type": "object", "properties": {
                    "name": {"type": "string"},
                    "location": {},
                    "tags": {"type": "array", "items": {"type": "string"}}
                }},
                "sanitization": {"properties": {
                    "name": {"rules": ["trim"]},
                    "location": {},
                    "tags": {"items": {}}
                }}
            })
        );
    }

    #[test]
    fn test_configured_defaults_apply() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.generate.schema = SchemaSelection::Validation;

        let mut args = args(&dir);
        args.save_to = Some(dir.path().join("validation.yaml"));
        let save_to = args.save_to.clone().unwrap();

        handle_generate(args, &config, &mut quiet_output()).unwrap();

        let saved: Value = serde_yaml::from_str(&std::fs::read_to_string(save_to).unwrap()).unwrap();
        assert_eq!(saved["type"], "object");
        assert!(saved.get("validation").is_none());
    }

    #[test]
    fn test_rejects_relative_pointer() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir);
        args.pointer = Some("mappings".to_string());

        let error = handle_generate(args, &Config::default(), &mut quiet_output()).unwrap_err();
        assert!(error.should_show_help());
    }

    #[test]
    fn test_missing_mapping_and_bad_options() {
        let dir = TempDir::new().unwrap();
        let mut missing = args(&dir);
        missing.mapping = PathBuf::from("/definitely/not/mapping.json");
        let error = handle_generate(missing, &Config::default(), &mut quiet_output()).unwrap_err();
        assert!(matches!(error, Error::FileNotFound { .. }));

        let options = dir.path().join("options.json");
        std::fs::write(&options, r#"{"arrayPaths": "tags"}"#).unwrap();
        let mut bad = args(&dir);
        bad.options = Some(options);
        let error = handle_generate(bad, &Config::default(), &mut quiet_output()).unwrap_err();
        assert_eq!(error.exit_code(), 2);
    }

    fn human_run(config: &Config) -> String {
        let dir = TempDir::new().unwrap();
        let captured = Captured::default();
        let mut output =
            OutputWriter::with_writer(OutputFormat::Human, false, false, Box::new(captured.clone()));
        handle_generate(args(&dir), config, &mut output).unwrap();
        captured.text()
    }

    #[test]
    fn test_unsupported_types_reported_once() {
        // Without warn-level logging the writer is the only channel
        let text = human_run(&Config::default());
        assert!(text.contains("1 field(s) skipped"));
        assert!(text.contains("geo_point"));

        // With it, stderr logging already carries the warning
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        let text = tracing::subscriber::with_default(subscriber, || human_run(&Config::default()));
        assert!(text.contains("Validation Schema"));
        assert!(!text.contains("field(s) skipped"));

        // Quiet logging (error level) falls back to the writer
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::ERROR)
            .with_writer(std::io::sink)
            .finish();
        let text = tracing::subscriber::with_default(subscriber, || human_run(&Config::default()));
        assert!(text.contains("1 field(s) skipped"));
    }

    #[test]
    fn test_select() {
        let schemas = mapschema_core::generate_schemas(&json!({"type": "long"}), None).unwrap();
        assert_eq!(select(&schemas, SchemaSelection::Validation), json!({"type": "integer"}));
        assert_eq!(select(&schemas, SchemaSelection::Sanitization), json!({}));
        assert_eq!(
            select(&schemas, SchemaSelection::Both),
            json!({"validation": {"type": "integer"}, "sanitization": {}})
        );
    }
}
