//! Round-trip behaviour across composed schemas.
//!
//! For every value a schema's `test` accepts, encoding and decoding again must
//! give the same value back.

use serde_json::{json, Value};
use wireform::{NativeEnum, ParseOptions, Schema, SchemaLike, SchemaRegistry};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Layout {
    Grid,
    List,
}

impl NativeEnum for Layout {
    fn members() -> &'static [Self] {
        &[Layout::Grid, Layout::List]
    }

    fn to_value(self) -> Value {
        match self {
            Layout::Grid => json!("grid"),
            Layout::List => json!("list"),
        }
    }
}

fn assert_round_trip<S>(schema: &S, value: S::Output)
where
    S: SchemaLike,
    S::Output: PartialEq + std::fmt::Debug,
{
    assert!(schema.test(&value), "value {:?} should pass test", value);
    let text = schema.stringify_json(&value).unwrap();
    assert_eq!(schema.parse_json(&text).unwrap(), value, "through {}", text);
}

#[test]
fn test_primitives_round_trip() {
    assert_round_trip(&Schema::null(), ());
    assert_round_trip(&Schema::boolean(), true);
    assert_round_trip(&Schema::number(), -12.75);
    assert_round_trip(&Schema::number(), 1e300);
    assert_round_trip(&Schema::bigint(), i64::MIN as i128);
    assert_round_trip(&Schema::string(), "ünïcödé \"quoted\"".to_string());
    assert_round_trip(&Schema::literal(3), 3);
    assert_round_trip(&Schema::native_enum::<Layout>(), Layout::List);
}

#[test]
fn test_wrappers_round_trip() {
    assert_round_trip(&Schema::number().optional(), Some(1.0));
    assert_round_trip(&Schema::number().nullable(), None);
    assert_round_trip(&Schema::string().auto_null_optional(), None);
    assert_round_trip(&Schema::string().nullable().optional(), Some(None));
    assert_round_trip(&Schema::boolean().catch(false), true);
    assert_round_trip(&Schema::boolean().with_default(false), true);
}

#[test]
fn test_collections_round_trip() {
    assert_round_trip(
        &Schema::array(Schema::tuple((Schema::string(), Schema::number()))),
        vec![("a".to_string(), 1.0), ("b".to_string(), 2.5)],
    );
    assert_round_trip(
        &Schema::array(Schema::number().nullable()),
        vec![Some(1.0), None],
    );
}

#[test]
fn test_settings_document_round_trip() {
    let schema = Schema::object()
        .field("layout", Schema::native_enum::<Layout>())
        .field("zoom", Schema::number().range(0.25..=4.0).catch(1.0))
        .field("recent", Schema::array(Schema::string()).max_len(3).with_default(Vec::new()))
        .field("window", Schema::object().field(
            "size",
            Schema::tuple((Schema::number().integer(), Schema::number().integer())),
        ).optional());

    let value = schema
        .parse(&json!({
            "layout": "grid",
            "zoom": 9,
            "window": {"size": [1280, 720]}
        }))
        .unwrap();

    assert_eq!(
        Value::Object(value.clone()),
        json!({
            "layout": "grid",
            "zoom": 1,
            "recent": [],
            "window": {"size": [1280, 720]}
        })
    );
    assert_round_trip(&schema, value);
}

#[test]
fn test_optional_element_in_array_fails_test() {
    let schema = Schema::array(Schema::number().optional());
    let value = vec![Some(1.0), None];

    assert!(!schema.test(&value));
    assert_eq!(schema.stringify_json(&value).unwrap(), "[1,null]");
    assert!(schema.parse_json("[1,null]").is_err());
    assert_round_trip(&schema, vec![Some(1.0)]);
}

#[test]
fn test_default_field_must_be_present() {
    let schema = Schema::object()
        .field("name", Schema::string())
        .field("theme", Schema::string().with_default("light".to_string()));

    let missing = json!({"name": "a"}).as_object().cloned().unwrap();
    assert!(!schema.test(&missing));

    let filled = json!({"name": "a", "theme": "light"}).as_object().cloned().unwrap();
    assert_round_trip(&schema, filled);
}

#[test]
fn test_healable_field_must_already_be_valid() {
    let schema = Schema::object().field("zoom", Schema::number().catch(1.0));

    let broken = json!({"zoom": "bad"}).as_object().cloned().unwrap();
    assert!(!schema.test(&broken));

    let healed = schema.parse(&json!({"zoom": "bad"})).unwrap();
    assert_round_trip(&schema, healed);
}

#[test]
fn test_erased_default_rejects_undefined() {
    let schema = Schema::number().with_default(3.0).erase();

    assert!(!schema.test(&None));
    assert_eq!(schema.parse_json("3").unwrap(), Some(json!(3)));
    assert_round_trip(&schema, Some(json!(3)));
}

#[test]
fn test_deep_nesting_hits_depth_limit() {
    let mut input = json!(1);
    for _ in 0..10 {
        input = json!([input]);
    }

    let mut schema = Schema::number().erase();
    for _ in 0..10 {
        schema = Schema::array(schema).erase();
    }

    assert!(schema.parse(&input).is_ok());

    let shallow = ParseOptions::new().with_max_depth(4);
    let err = schema.parse_with(Some(&input), &shallow).unwrap_err();
    assert_eq!(err.to_string(), "$.0.0.0.0.0: exceeds maximum depth of 4");

    let registry = SchemaRegistry::new().with_max_depth(4);
    registry.register("nested", schema).unwrap();
    assert!(registry.parse("nested", Some(&input)).is_err());
}
