//! Schemas for scalar JSON values: `null`, booleans, literals and native
//! enums.

use std::fmt;
use std::marker::PhantomData;

use serde_json::{json, Value};

use crate::context::DecodeContext;
use crate::error::{Decoded, EncodeError};
use crate::interop::ToJsonSchema;

use super::traits::SchemaLike;

/// A schema that accepts only `null`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSchema;

impl ToJsonSchema for NullSchema {
    fn to_json_schema(&self) -> Value {
        json!({ "type": "null" })
    }
}

impl SchemaLike for NullSchema {
    type Output = ();

    fn test(&self, _value: &()) -> bool {
        true
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<()> {
        match input {
            Some(Value::Null) => Ok(()),
            _ => Err(ctx.fail("expect null")),
        }
    }

    fn encode(&self, _value: &()) -> Result<Option<Value>, EncodeError> {
        Ok(Some(Value::Null))
    }
}

/// A schema that accepts `true` or `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanSchema;

impl ToJsonSchema for BooleanSchema {
    fn to_json_schema(&self) -> Value {
        json!({ "type": "boolean" })
    }
}

impl SchemaLike for BooleanSchema {
    type Output = bool;

    fn test(&self, _value: &bool) -> bool {
        true
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<bool> {
        match input {
            Some(Value::Bool(b)) => Ok(*b),
            _ => Err(ctx.fail("expect boolean")),
        }
    }

    fn encode(&self, value: &bool) -> Result<Option<Value>, EncodeError> {
        Ok(Some(Value::Bool(*value)))
    }
}

/// A schema that accepts exactly one value.
///
/// Numbers compare numerically, so a literal `1.0` accepts the JSON text `1`.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let version = Schema::literal(2);
///
/// assert_eq!(version.parse(&json!(2)).unwrap(), 2);
/// assert_eq!(version.parse(&json!(3)).unwrap_err().message, "expect literal 2");
/// ```
#[derive(Clone, Debug)]
pub struct LiteralSchema<T> {
    literal: T,
    expected: Value,
}

impl<T> LiteralSchema<T>
where
    T: Clone + PartialEq + Into<Value> + Send + Sync,
{
    /// Creates a schema accepting only `literal`.
    pub fn new(literal: T) -> Self {
        let expected = literal.clone().into();
        Self { literal, expected }
    }

    /// Returns the accepted value.
    pub fn value(&self) -> &T {
        &self.literal
    }
}

impl<T> ToJsonSchema for LiteralSchema<T> {
    fn to_json_schema(&self) -> Value {
        json!({ "const": self.expected })
    }
}

impl<T> SchemaLike for LiteralSchema<T>
where
    T: Clone + PartialEq + Into<Value> + Send + Sync,
{
    type Output = T;

    fn test(&self, value: &T) -> bool {
        *value == self.literal
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<T> {
        match input {
            Some(value) if json_eq(value, &self.expected) => Ok(self.literal.clone()),
            _ => Err(ctx.fail(format!("expect literal {}", self.expected))),
        }
    }

    fn encode(&self, value: &T) -> Result<Option<Value>, EncodeError> {
        Ok(Some(value.clone().into()))
    }
}

/// A closed set of values that round-trip as themselves.
///
/// Implemented for plain Rust enums that mirror a fixed set of JSON values.
///
/// # Example
///
/// ```rust
/// use wireform::{NativeEnum, Schema, SchemaLike};
/// use serde_json::{json, Value};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Theme {
///     Light,
///     Dark,
/// }
///
/// impl NativeEnum for Theme {
///     fn members() -> &'static [Self] {
///         &[Theme::Light, Theme::Dark]
///     }
///
///     fn to_value(self) -> Value {
///         match self {
///             Theme::Light => json!("light"),
///             Theme::Dark => json!("dark"),
///         }
///     }
/// }
///
/// let schema = Schema::native_enum::<Theme>();
/// assert_eq!(schema.parse(&json!("dark")).unwrap(), Theme::Dark);
/// assert_eq!(
///     schema.parse(&json!("blue")).unwrap_err().message,
///     r#"expect one of "light", "dark""#
/// );
/// ```
pub trait NativeEnum: Copy + PartialEq + Send + Sync + 'static {
    /// Returns every member, in declaration order.
    fn members() -> &'static [Self];

    /// Returns the JSON value this member is stored as.
    fn to_value(self) -> Value;
}

/// A schema accepting the JSON value of any member of `E`.
pub struct EnumSchema<E> {
    marker: PhantomData<fn() -> E>,
}

impl<E: NativeEnum> EnumSchema<E> {
    /// Creates a schema for `E`.
    pub fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }

    fn expected(&self) -> String {
        E::members()
            .iter()
            .map(|member| member.to_value().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<E: NativeEnum> Default for EnumSchema<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EnumSchema<E> {
    fn clone(&self) -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<E> fmt::Debug for EnumSchema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumSchema")
            .field("type", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E: NativeEnum> ToJsonSchema for EnumSchema<E> {
    fn to_json_schema(&self) -> Value {
        let values: Vec<Value> = E::members().iter().map(|m| m.to_value()).collect();
        json!({ "enum": values })
    }
}

impl<E: NativeEnum> SchemaLike for EnumSchema<E> {
    type Output = E;

    fn test(&self, value: &E) -> bool {
        E::members().contains(value)
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<E> {
        let found = input.and_then(|input| {
            E::members()
                .iter()
                .find(|member| json_eq(&member.to_value(), input))
        });
        match found {
            Some(member) => Ok(*member),
            None => Err(ctx.fail(format!("expect one of {}", self.expected()))),
        }
    }

    fn encode(&self, value: &E) -> Result<Option<Value>, EncodeError> {
        Ok(Some(value.to_value()))
    }
}

/// Compares JSON values, treating numbers by numeric value.
pub(crate) fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_f64() || y.is_f64() {
                return x.as_f64() == y.as_f64();
            }
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x == y,
                // Only one side fits in i64, so the other is above i64::MAX.
                (Some(_), None) | (None, Some(_)) => false,
                (None, None) => x.as_u64() == y.as_u64(),
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
    }

    impl NativeEnum for Level {
        fn members() -> &'static [Self] {
            &[Level::Low, Level::High]
        }

        fn to_value(self) -> Value {
            match self {
                Level::Low => json!(1),
                Level::High => json!(10),
            }
        }
    }

    #[test]
    fn test_null_schema() {
        assert!(NullSchema.parse(&json!(null)).is_ok());
        assert_eq!(NullSchema.parse(&json!(0)).unwrap_err().message, "expect null");
        assert_eq!(NullSchema.encode(&()).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_null_rejects_undefined() {
        let mut ctx = DecodeContext::new();
        assert!(NullSchema.decode(None, &mut ctx).is_err());
    }

    #[test]
    fn test_boolean_schema() {
        assert!(BooleanSchema.parse(&json!(true)).unwrap());
        assert_eq!(
            BooleanSchema.parse(&json!("true")).unwrap_err().message,
            "expect boolean"
        );
    }

    #[test]
    fn test_literal_string() {
        let schema = LiteralSchema::new("on".to_string());
        assert_eq!(schema.parse(&json!("on")).unwrap(), "on");
        assert_eq!(
            schema.parse(&json!("off")).unwrap_err().message,
            r#"expect literal "on""#
        );
        assert!(schema.test(&"on".to_string()));
        assert!(!schema.test(&"off".to_string()));
    }

    #[test]
    fn test_literal_number_compares_numerically() {
        let schema = LiteralSchema::new(1.0);
        assert_eq!(schema.parse(&json!(1)).unwrap(), 1.0);
        assert!(schema.parse(&json!(1.5)).is_err());
    }

    #[test]
    fn test_native_enum_roundtrip() {
        let schema = EnumSchema::<Level>::new();
        assert_eq!(schema.parse(&json!(10)).unwrap(), Level::High);
        assert_eq!(schema.parse(&json!(1.0)).unwrap(), Level::Low);
        assert_eq!(schema.encode(&Level::Low).unwrap(), Some(json!(1)));
        assert_eq!(
            schema.parse(&json!(5)).unwrap_err().message,
            "expect one of 1, 10"
        );
    }

    #[test]
    fn test_native_enum_json_schema() {
        assert_eq!(
            EnumSchema::<Level>::new().to_json_schema(),
            json!({"enum": [1, 10]})
        );
    }

    #[test]
    fn test_json_eq() {
        assert!(json_eq(&json!([1, {"a": 2.0}]), &json!([1.0, {"a": 2}])));
        assert!(!json_eq(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!json_eq(&json!("1"), &json!(1)));
    }

    #[test]
    fn test_json_eq_large_integers() {
        assert!(json_eq(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!json_eq(&json!(u64::MAX), &json!(u64::MAX - 1)));
        assert!(!json_eq(&json!(i64::MAX as u64 + 1), &json!(i64::MIN)));
        assert!(!json_eq(&json!(9_007_199_254_740_993_u64), &json!(9_007_199_254_740_992_u64)));
    }

    #[test]
    fn test_literal_distinguishes_large_integers() {
        let schema = LiteralSchema::new(u64::MAX);
        assert_eq!(schema.parse(&json!(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(
            schema.parse(&json!(u64::MAX - 1)).unwrap_err().message,
            format!("expect literal {}", u64::MAX)
        );
    }
}
