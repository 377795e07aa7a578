//! Property-based tests for schema generation
//!
//! These tests verify that the generator and the path-rule helpers behave
//! correctly across a wide range of mappings and options.

use mapschema_core::{generate_schemas, ArrayPaths, PathRule, PathRules};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 10, 5, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            proptest::collection::hash_map("[a-zA-Z_]{1,12}", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for mapping field types, including a few unsupported ones
fn field_type_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("integer"),
        Just("long"),
        Just("short"),
        Just("byte"),
        Just("double"),
        Just("float"),
        Just("number"),
        Just("text"),
        Just("keyword"),
        Just("string"),
        Just("boolean"),
        Just("date"),
        Just("geo_point"),
        Just("ip"),
    ]
}

/// Strategy for generating well-formed mappings rooted at `properties`
fn mapping_strategy() -> impl Strategy<Value = Value> {
    let leaf = field_type_strategy().prop_map(|t| json!({"type": t}));

    let node = leaf.prop_recursive(4, 32, 4, |inner| {
        (
            proptest::collection::btree_map("[a-z]{1,6}", inner, 1..4),
            proptest::option::of(prop_oneof![Just("object"), Just("nested")]),
        )
            .prop_map(|(properties, field_type)| {
                let mut node = json!({"properties": properties});
                if let Some(t) = field_type {
                    node["type"] = json!(t);
                }
                node
            })
    });

    proptest::collection::btree_map("[a-z]{1,6}", node, 1..5)
        .prop_map(|properties| json!({"properties": properties}))
}

/// Every field path in a mapping, parents before children
fn field_paths(node: &Value, prefix: &str, found: &mut Vec<String>) {
    if let Some(properties) = node.get("properties").and_then(Value::as_object) {
        for (name, child) in properties {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            found.push(path.clone());
            field_paths(child, &path, found);
        }
    }
}

/// A mapping together with a subset of its field paths to treat as arrays
fn mapping_with_array_paths() -> impl Strategy<Value = (Value, Vec<String>)> {
    mapping_strategy().prop_flat_map(|mapping| {
        let mut paths = Vec::new();
        field_paths(&mapping, "", &mut paths);
        let len = paths.len();
        (Just(mapping), proptest::sample::subsequence(paths, 0..=len))
    })
}

/// Dot paths over a small alphabet so they collide with mapping fields
fn dot_path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just("a"), Just("b"), Just("*")], 1..4)
        .prop_map(|segments| segments.join("."))
}

fn path_rules_strategy() -> impl Strategy<Value = PathRules> {
    proptest::collection::vec(
        (prop_oneof![Just("optional"), Just("strict"), Just("def")], dot_path_strategy()),
        0..8,
    )
    .prop_map(|rules| {
        rules.into_iter().fold(PathRules::new(), |acc, (kind, path)| {
            acc.with_rule(kind, path, json!(true))
        })
    })
}

/// Collect every `type` attribute anywhere in a schema
fn collect_types(schema: &Value, found: &mut Vec<Value>) {
    if let Value::Object(map) = schema {
        if let Some(t) = map.get("type") {
            found.push(t.clone());
        }
        if let Some(items) = map.get("items") {
            collect_types(items, found);
        }
        if let Some(Value::Object(properties)) = map.get("properties") {
            for child in properties.values() {
                collect_types(child, found);
            }
        }
    }
}

/// Assert that `schema` has the same property tree as `mapping`, looking
/// through `items` wherever a field was expanded into an array
fn assert_same_shape(mapping: &Value, schema: &Value) -> Result<(), TestCaseError> {
    let schema = schema.get("items").unwrap_or(schema);
    let mapping_props = mapping.get("properties").and_then(Value::as_object);
    let schema_props = schema.get("properties").and_then(Value::as_object);

    match (mapping_props, schema_props) {
        (Some(expected), Some(actual)) => {
            let expected_keys: Vec<&String> = expected.keys().collect();
            let actual_keys: Vec<&String> = actual.keys().collect();
            prop_assert_eq!(expected_keys, actual_keys);
            for (name, child) in expected {
                assert_same_shape(child, &actual[name])?;
            }
        }
        (None, None) => {}
        (expected, actual) => {
            prop_assert!(false, "shape mismatch: {:?} vs {:?}", expected, actual);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generator_never_panics(
        mapping in json_value_strategy(),
        options in json_value_strategy()
    ) {
        // Arbitrary documents are either accepted or rejected with an error
        let _ = generate_schemas(&mapping, Some(&options));
        let _ = generate_schemas(&mapping, None);
    }

    #[test]
    fn prop_schemas_mirror_mapping_shape((mapping, arrays) in mapping_with_array_paths()) {
        let options = json!({"arrayPaths": arrays});
        let schemas = generate_schemas(&mapping, Some(&options)).unwrap();
        assert_same_shape(&mapping, &schemas.validation.to_value())?;
        assert_same_shape(&mapping, &schemas.sanitization.to_value())?;
    }

    #[test]
    fn prop_empty_allowlist_yields_no_sanitization_types(mapping in mapping_strategy()) {
        let options = json!({"sanitization": {"all": {"strict": true, "optional": true}}});
        let schemas = generate_schemas(&mapping, Some(&options)).unwrap();

        let mut types = Vec::new();
        collect_types(&schemas.sanitization.to_value(), &mut types);
        prop_assert!(types.is_empty(), "unexpected types {:?}", types);
    }

    #[test]
    fn prop_generation_is_deterministic(
        mapping in mapping_strategy(),
        arrays in proptest::collection::vec(dot_path_strategy(), 0..4)
    ) {
        let options = json!({"arrayPaths": arrays});
        let first = generate_schemas(&mapping, Some(&options)).unwrap();
        let second = generate_schemas(&mapping, Some(&options)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_narrow_keeps_only_matching_rules(rules in path_rules_strategy()) {
        let narrowed = rules.narrow("a");
        prop_assert!(narrowed.len() <= rules.len());

        // Whatever survives came from a rule under `a` or a wildcard
        let survivors = rules
            .iter()
            .flat_map(|(_, list)| list.iter())
            .filter(|rule| rule.leads_to("a") && rule.path.contains('.'))
            .count();
        prop_assert_eq!(narrowed.len(), survivors);
    }

    #[test]
    fn prop_local_overrides_exact_beats_wildcard(path in "[a-z]{1,6}") {
        let rules = PathRules::new()
            .with_rule("def", path.clone(), json!("exact"))
            .with_rule("def", "*", json!("wildcard"));
        let exact = rules.local_overrides(&path);
        let other = rules.local_overrides("zzzzzzz");
        prop_assert_eq!(exact.get("def"), Some(&json!("exact")));
        prop_assert_eq!(other.get("def"), Some(&json!("wildcard")));
    }

    #[test]
    fn prop_exact_path_beats_wildcard_ancestor(parent in "[a-z]{1,6}", child in "[a-z]{1,6}") {
        let rules = PathRules::new()
            .with_rule("def", format!("{}.{}", parent, child), json!("exact"))
            .with_rule("def", format!("*.{}", child), json!("wildcard"));
        let under_parent = rules.narrow(&parent).local_overrides(&child);
        let elsewhere = rules.narrow("zzzzzzz").local_overrides(&child);
        prop_assert_eq!(under_parent.get("def"), Some(&json!("exact")));
        prop_assert_eq!(elsewhere.get("def"), Some(&json!("wildcard")));
    }

    #[test]
    fn prop_array_paths_narrow_drops_head(paths in proptest::collection::vec(dot_path_strategy(), 0..6)) {
        let array_paths: ArrayPaths = paths.iter().cloned().collect();
        let narrowed = array_paths.narrow("a");

        for rest in narrowed.as_slice() {
            let full = format!("a.{}", rest);
            prop_assert!(paths.contains(&full), "{} not derived from {:?}", full, paths);
        }
    }

    #[test]
    fn prop_rule_leads_to_its_head(path in dot_path_strategy(), other in "[c-z]{1,6}") {
        let head = path.split('.').next().unwrap_or_default().to_string();
        let rule = PathRule::new(path, json!(1));
        prop_assert!(rule.leads_to(&head));
        // Only a wildcard head matches an unrelated field
        prop_assert_eq!(rule.leads_to(&other), head == "*");
    }
}
