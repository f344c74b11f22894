//! Integration tests for object schemas.

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use wireform::{EncodeError, Schema, SchemaLike};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn window() -> wireform::ObjectSchema {
    Schema::object()
        .field("title", Schema::string().min_len(1))
        .field("size", Schema::tuple((Schema::number(), Schema::number())))
        .field("maximized", Schema::boolean().with_default(false))
        .field("monitor", Schema::string().optional())
}

#[test]
fn test_decodes_declared_fields() {
    let value = window()
        .parse(&json!({"title": "main", "size": [800, 600], "monitor": "DP-1"}))
        .unwrap();
    assert_eq!(
        value,
        object(json!({
            "title": "main",
            "size": [800, 600],
            "maximized": false,
            "monitor": "DP-1"
        }))
    );
}

#[test]
fn test_missing_required_field_reports_its_key() {
    let err = window().parse(&json!({"title": "main"})).unwrap_err();
    assert_eq!(err.to_string(), "$.size: expect array");
}

#[test]
fn test_nested_field_failure_path() {
    let err = window()
        .parse(&json!({"title": "main", "size": [800, "wide"]}))
        .unwrap_err();
    assert_eq!(err.to_string(), "$.size.1: expect number");
}

#[test]
fn test_absent_optional_field_is_not_materialised() {
    let value = window()
        .parse(&json!({"title": "main", "size": [1, 1]}))
        .unwrap();
    assert!(!value.contains_key("monitor"));
    assert!(value.contains_key("maximized"));
}

#[test]
fn test_unknown_keys_ignored_or_denied() {
    let input = json!({"title": "main", "size": [1, 1], "theme": "dark"});

    let value = window().parse(&input).unwrap();
    assert!(!value.contains_key("theme"));

    let err = window().deny_unknown_keys().parse(&input).unwrap_err();
    assert_eq!(err.to_string(), "$.theme: unknown key");
}

#[test]
fn test_encode_round_trip() {
    let schema = window();
    let value = schema
        .parse(&json!({"title": "main", "size": [800.0, 600.0], "maximized": true}))
        .unwrap();
    let text = schema.stringify_json(&value).unwrap();
    assert_eq!(text, r#"{"title":"main","size":[800,600],"maximized":true}"#);
    assert_eq!(schema.parse_json(&text).unwrap(), value);
}

#[test]
fn test_encode_rejects_invalid_field() {
    let err = window()
        .encode(&object(json!({"title": "", "size": [1, 1]})))
        .unwrap_err();
    match err {
        EncodeError::Invalid(issue) => {
            assert_eq!(issue.message, "length must be at least 1, got 0")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_required_and_optional_keys() {
    let schema = window();
    assert_eq!(schema.required_keys(), vec!["title", "size"]);
    assert_eq!(schema.optional_keys(), vec!["maximized", "monitor"]);
    assert_eq!(
        schema.keys().collect::<Vec<_>>(),
        vec!["title", "size", "maximized", "monitor"]
    );
}

#[test]
fn test_empty_object_schema_accepts_any_object() {
    let schema = Schema::object();
    assert!(schema.parse(&json!({"a": 1})).unwrap().is_empty());
    assert!(schema.parse(&json!([])).is_err());
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Account {
    id: u64,
    name: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[test]
fn test_into_struct() {
    let schema = Schema::object()
        .field("id", Schema::number().integer().min(0.0))
        .field("name", Schema::string())
        .field("tags", Schema::array(Schema::string()).with_default(Vec::new()))
        .into_struct::<Account>();

    let account = schema.parse(&json!({"id": 3, "name": "ops"})).unwrap();
    assert_eq!(
        account,
        Account {
            id: 3,
            name: "ops".to_string(),
            tags: Vec::new()
        }
    );
    assert_eq!(
        schema.stringify_json(&account).unwrap(),
        r#"{"id":3,"name":"ops","tags":[]}"#
    );

    let err = schema.parse(&json!({"id": -1, "name": "ops"})).unwrap_err();
    assert_eq!(err.to_string(), "$.id: must be at least 0, got -1");
}
