//! Fixed-length heterogeneous arrays.
//!
//! [`TupleSchema`] wraps a Rust tuple of schemas, arities 1 through 8, and
//! decodes a JSON array of exactly that length position by position.

use serde_json::{json, Value};

use crate::context::DecodeContext;
use crate::error::{Decoded, EncodeError};
use crate::interop::ToJsonSchema;

use super::traits::SchemaLike;

/// A schema for fixed-length arrays with one schema per position.
///
/// Arrays shorter or longer than the tuple are rejected; nothing is padded or
/// truncated.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let point = Schema::tuple((Schema::number(), Schema::string()));
///
/// assert_eq!(point.parse(&json!([1, "x"])).unwrap(), (1.0, "x".to_string()));
///
/// let err = point.parse(&json!([1])).unwrap_err();
/// assert_eq!(err.to_string(), "$: expect tuple of length 2");
///
/// let err = point.parse(&json!([1, 2])).unwrap_err();
/// assert_eq!(err.to_string(), "$.1: expect string");
/// ```
#[derive(Clone, Debug)]
pub struct TupleSchema<T> {
    members: T,
}

impl<T> TupleSchema<T> {
    /// Creates a tuple schema from a tuple of member schemas.
    pub fn new(members: T) -> Self {
        Self { members }
    }

    /// Returns the member schemas.
    pub fn members(&self) -> &T {
        &self.members
    }
}

macro_rules! impl_tuple_schema {
    ($len:expr; $($name:ident $idx:tt),+) => {
        impl<$($name: SchemaLike),+> ToJsonSchema for TupleSchema<($($name,)+)> {
            fn to_json_schema(&self) -> Value {
                let prefix = vec![$(self.members.$idx.to_json_schema()),+];
                json!({
                    "type": "array",
                    "prefixItems": prefix,
                    "minItems": $len,
                    "maxItems": $len
                })
            }
        }

        impl<$($name: SchemaLike),+> SchemaLike for TupleSchema<($($name,)+)> {
            type Output = ($($name::Output,)+);

            fn test(&self, value: &Self::Output) -> bool {
                $(
                    self.members.$idx.test(&value.$idx)
                        && !matches!(self.members.$idx.encode(&value.$idx), Ok(None))
                )&&+
            }

            fn decode(
                &self,
                input: Option<&Value>,
                ctx: &mut DecodeContext,
            ) -> Decoded<Self::Output> {
                let Some(items) = input.and_then(Value::as_array) else {
                    return Err(ctx.fail("expect array"));
                };
                if items.len() != $len {
                    return Err(ctx.fail(format!("expect tuple of length {}", $len)));
                }

                Ok(($(
                    {
                        let mut scope = ctx.enter($idx as usize)?;
                        self.members.$idx.decode(Some(&items[$idx]), &mut scope)?
                    },
                )+))
            }

            fn encode(&self, value: &Self::Output) -> Result<Option<Value>, EncodeError> {
                let items = vec![$(
                    self.members.$idx.encode(&value.$idx)?.unwrap_or(Value::Null)
                ),+];
                Ok(Some(Value::Array(items)))
            }
        }
    };
}

impl_tuple_schema!(1; A 0);
impl_tuple_schema!(2; A 0, B 1);
impl_tuple_schema!(3; A 0, B 1, C 2);
impl_tuple_schema!(4; A 0, B 1, C 2, D 3);
impl_tuple_schema!(5; A 0, B 1, C 2, D 3, E 4);
impl_tuple_schema!(6; A 0, B 1, C 2, D 3, E 4, F 5);
impl_tuple_schema!(7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_tuple_schema!(8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[test]
    fn test_single_member_tuple() {
        let schema = TupleSchema::new((Schema::boolean(),));
        assert_eq!(schema.parse(&json!([true])).unwrap(), (true,));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let schema = TupleSchema::new((Schema::number(), Schema::string()));
        for input in [json!([]), json!([1]), json!([1, "x", 2])] {
            assert_eq!(
                schema.parse(&input).unwrap_err().to_string(),
                "$: expect tuple of length 2"
            );
        }
    }

    #[test]
    fn test_rejects_non_array() {
        let schema = TupleSchema::new((Schema::number(),));
        assert_eq!(
            schema.parse(&json!({"0": 1})).unwrap_err().message,
            "expect array"
        );
    }

    #[test]
    fn test_first_failing_position_reported() {
        let schema = TupleSchema::new((Schema::number(), Schema::string(), Schema::boolean()));
        let err = schema.parse(&json!(["a", 1, null])).unwrap_err();
        assert_eq!(err.to_string(), "$.0: expect number");
    }

    #[test]
    fn test_positional_encode_and_test() {
        let schema = TupleSchema::new((Schema::number().integer(), Schema::string().optional()));
        let value = (3.0, Some("x".to_string()));

        assert!(schema.test(&value));
        assert!(!schema.test(&(3.5, Some("x".to_string()))));
        assert_eq!(schema.to_json_value(&value).unwrap(), json!([3, "x"]));
    }

    #[test]
    fn test_undefined_member_fails_test() {
        let schema = TupleSchema::new((Schema::number(), Schema::string().optional()));
        let value = (3.0, None);

        assert!(!schema.test(&value));
        assert_eq!(schema.to_json_value(&value).unwrap(), json!([3, null]));
        assert!(schema.parse(&json!([3, null])).is_err());
    }

    #[test]
    fn test_largest_arity() {
        let n = Schema::number;
        let schema = TupleSchema::new((n(), n(), n(), n(), n(), n(), n(), n()));
        let value = schema.parse(&json!([1, 2, 3, 4, 5, 6, 7, 8])).unwrap();
        assert_eq!(value.7, 8.0);
    }

    #[test]
    fn test_json_schema() {
        let schema = TupleSchema::new((Schema::number(), Schema::null()));
        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "array",
                "prefixItems": [{"type": "number"}, {"type": "null"}],
                "minItems": 2,
                "maxItems": 2
            })
        );
    }
}
