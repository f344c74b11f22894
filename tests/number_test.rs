//! Integration tests for number and bigint schemas.

use serde_json::json;
use wireform::{EncodeError, Schema, SchemaLike, ToJsonSchema};

#[test]
fn test_accepts_integers_and_floats() {
    let schema = Schema::number();
    assert_eq!(schema.parse(&json!(42)).unwrap(), 42.0);
    assert_eq!(schema.parse(&json!(-1.5)).unwrap(), -1.5);
    assert_eq!(schema.parse(&json!("42")).unwrap_err().message, "expect number");
}

#[test]
fn test_range_boundaries() {
    let schema = Schema::number().range(0.0..=1.0);
    assert!(schema.parse(&json!(0)).is_ok());
    assert!(schema.parse(&json!(1)).is_ok());
    assert_eq!(
        schema.parse(&json!(-0.5)).unwrap_err().message,
        "must be at least 0, got -0.5"
    );
    assert_eq!(
        schema.parse(&json!(2)).unwrap_err().message,
        "must be at most 1, got 2"
    );
}

#[test]
fn test_integer_constraint() {
    let schema = Schema::number().integer();
    assert!(schema.parse(&json!(3)).is_ok());
    assert!(schema.parse(&json!(3.0)).is_ok());
    assert_eq!(
        schema.parse(&json!(3.5)).unwrap_err().message,
        "must be an integer, got 3.5"
    );
}

#[test]
fn test_custom_constraint_message() {
    let schema = Schema::number().min(18.0).error("must be an adult");
    assert_eq!(schema.parse(&json!(12)).unwrap_err().message, "must be an adult");
}

#[test]
fn test_integral_values_encode_as_integers() {
    let schema = Schema::number();
    assert_eq!(schema.stringify_json(&3.0).unwrap(), "3");
    assert_eq!(schema.stringify_json(&0.25).unwrap(), "0.25");
}

#[test]
fn test_non_finite_values_fail_test_and_encode() {
    let schema = Schema::number();
    assert!(!schema.test(&f64::NAN));
    assert!(matches!(
        schema.encode(&f64::NEG_INFINITY),
        Err(EncodeError::NonFiniteNumber(_))
    ));
}

#[test]
fn test_bigint_accepts_whole_numbers() {
    let schema = Schema::bigint();
    assert_eq!(schema.parse(&json!(9_007_199_254_740_993_i64)).unwrap(), 9_007_199_254_740_993);
    assert_eq!(schema.parse(&json!(u64::MAX)).unwrap(), u64::MAX as i128);
    assert_eq!(schema.parse(&json!(1.5)).unwrap_err().message, "expect bigint");
    assert_eq!(schema.parse(&json!("1")).unwrap_err().message, "expect bigint");
}

#[test]
fn test_bigint_encode_out_of_range() {
    let schema = Schema::bigint();
    assert_eq!(schema.stringify_json(&-5).unwrap(), "-5");
    assert!(matches!(
        schema.encode(&(u64::MAX as i128 + 1)),
        Err(EncodeError::BigIntOutOfRange(_))
    ));
}

#[test]
fn test_json_schema_keywords() {
    assert_eq!(
        Schema::number().integer().range(1.0..=65535.0).to_json_schema(),
        json!({"type": "integer", "minimum": 1, "maximum": 65535})
    );
    assert_eq!(
        Schema::number().min(0.5).to_json_schema(),
        json!({"type": "number", "minimum": 0.5})
    );
}
