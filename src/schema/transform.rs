//! Schemas that map a decoded value through caller-supplied functions.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::DecodeContext;
use crate::error::{Decoded, EncodeError};
use crate::interop::ToJsonSchema;

use super::traits::SchemaLike;

type TestFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type DecodeFn<I, T> = Box<dyn Fn(I) -> T + Send + Sync>;
type EncodeFn<T, O> = Box<dyn Fn(&T) -> O + Send + Sync>;

/// Maps the output of `S` into `T`.
///
/// The decode and encode functions must be inverses of each other; the schema
/// cannot check that.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let timeout = Schema::number().integer().min(0.0).transform(
///     |_: &Duration| true,
///     |ms| Duration::from_millis(ms as u64),
///     |d: &Duration| d.as_millis() as f64,
/// );
///
/// let value = timeout.parse(&json!(1500)).unwrap();
/// assert_eq!(value, Duration::from_millis(1500));
/// assert_eq!(timeout.to_json_value(&value).unwrap(), json!(1500));
/// ```
pub struct Transform<S: SchemaLike, T> {
    inner: S,
    test: TestFn<T>,
    decode: DecodeFn<S::Output, T>,
    encode: EncodeFn<T, S::Output>,
}

impl<S: SchemaLike, T> Transform<S, T> {
    /// Wraps `inner` with the given predicate and conversions.
    pub fn new<P, D, E>(inner: S, test: P, decode: D, encode: E) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        D: Fn(S::Output) -> T + Send + Sync + 'static,
        E: Fn(&T) -> S::Output + Send + Sync + 'static,
    {
        Self {
            inner,
            test: Box::new(test),
            decode: Box::new(decode),
            encode: Box::new(encode),
        }
    }
}

impl<S: SchemaLike, T> ToJsonSchema for Transform<S, T> {
    fn to_json_schema(&self) -> Value {
        self.inner.to_json_schema()
    }
}

impl<S: SchemaLike, T> SchemaLike for Transform<S, T> {
    type Output = T;

    fn test(&self, value: &T) -> bool {
        (self.test)(value)
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<T> {
        let decoded = self.inner.decode(input, ctx)?;
        Ok((self.decode)(decoded))
    }

    fn encode(&self, value: &T) -> Result<Option<Value>, EncodeError> {
        self.inner.encode(&(self.encode)(value))
    }

    fn accepts_undefined(&self) -> bool {
        self.inner.accepts_undefined()
    }
}

/// Maps the output of `S` into `T` with fallible conversions.
///
/// A failed decode conversion becomes an issue at the current path; a failed
/// encode conversion becomes [`EncodeError::Transform`].
///
/// # Example
///
/// ```rust
/// use std::net::Ipv4Addr;
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let addr = Schema::string().try_transform(
///     |s| s.parse::<Ipv4Addr>().map_err(|e| e.to_string()),
///     |ip: &Ipv4Addr| Ok(ip.to_string()),
/// );
///
/// assert_eq!(addr.parse(&json!("10.0.0.1")).unwrap(), Ipv4Addr::new(10, 0, 0, 1));
///
/// let err = addr.parse(&json!("nope")).unwrap_err();
/// assert_eq!(err.to_string(), "$: invalid IPv4 address syntax");
/// ```
pub struct TryTransform<S: SchemaLike, T> {
    inner: S,
    decode: DecodeFn<S::Output, Result<T, String>>,
    encode: EncodeFn<T, Result<S::Output, String>>,
}

impl<S: SchemaLike, T> TryTransform<S, T> {
    /// Wraps `inner` with the given conversions.
    pub fn new<D, E>(inner: S, decode: D, encode: E) -> Self
    where
        D: Fn(S::Output) -> Result<T, String> + Send + Sync + 'static,
        E: Fn(&T) -> Result<S::Output, String> + Send + Sync + 'static,
    {
        Self {
            inner,
            decode: Box::new(decode),
            encode: Box::new(encode),
        }
    }
}

impl<S: SchemaLike, T> ToJsonSchema for TryTransform<S, T> {
    fn to_json_schema(&self) -> Value {
        self.inner.to_json_schema()
    }
}

impl<S: SchemaLike, T> SchemaLike for TryTransform<S, T> {
    type Output = T;

    fn test(&self, value: &T) -> bool {
        match (self.encode)(value) {
            Ok(encoded) => self.inner.test(&encoded),
            Err(_) => false,
        }
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<T> {
        let decoded = self.inner.decode(input, ctx)?;
        (self.decode)(decoded).map_err(|message| ctx.fail(message))
    }

    fn encode(&self, value: &T) -> Result<Option<Value>, EncodeError> {
        let encoded = (self.encode)(value).map_err(EncodeError::Transform)?;
        self.inner.encode(&encoded)
    }

    fn accepts_undefined(&self) -> bool {
        self.inner.accepts_undefined()
    }
}

/// Bridges an object-shaped schema to a serde struct.
pub(crate) fn into_struct<S, T>(schema: S) -> TryTransform<S, T>
where
    S: SchemaLike<Output = Map<String, Value>> + 'static,
    T: Serialize + DeserializeOwned + 'static,
{
    TryTransform::new(
        schema,
        |fields| serde_json::from_value(Value::Object(fields)).map_err(|err| err.to_string()),
        |value: &T| match serde_json::to_value(value) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err("struct did not serialize to an object".to_string()),
            Err(err) => Err(err.to_string()),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Celsius(f64);

    fn celsius() -> Transform<crate::schema::NumberSchema, Celsius> {
        Schema::number().transform(|c: &Celsius| c.0 >= -273.15, Celsius, |c: &Celsius| c.0)
    }

    #[test]
    fn test_transform_maps_both_directions() {
        let schema = celsius();
        let value = schema.parse(&json!(21.5)).unwrap();

        assert_eq!(value, Celsius(21.5));
        assert_eq!(schema.to_json_value(&value).unwrap(), json!(21.5));
    }

    #[test]
    fn test_transform_test_uses_caller_predicate() {
        let schema = celsius();
        assert!(schema.test(&Celsius(0.0)));
        assert!(!schema.test(&Celsius(-300.0)));
    }

    #[test]
    fn test_transform_keeps_inner_issue() {
        let err = celsius().parse(&json!("warm")).unwrap_err();
        assert_eq!(err.to_string(), "$: expect number");
    }

    #[test]
    fn test_try_transform_decode_error_is_an_issue() {
        let schema = Schema::string().try_transform(
            |s| s.parse::<u8>().map_err(|_| format!("not a byte: {s}")),
            |b: &u8| Ok(b.to_string()),
        );

        assert_eq!(schema.parse(&json!("7")).unwrap(), 7);
        let err = schema.parse(&json!("700")).unwrap_err();
        assert_eq!(err.message, "not a byte: 700");
    }

    #[test]
    fn test_try_transform_encode_error() {
        let schema = Schema::string().try_transform(
            |s| Ok::<_, String>(s.len()),
            |n: &usize| {
                if *n > 3 {
                    Err("too long".to_string())
                } else {
                    Ok("x".repeat(*n))
                }
            },
        );

        assert!(schema.test(&2));
        assert!(!schema.test(&5));
        assert!(matches!(
            schema.encode(&5),
            Err(EncodeError::Transform(ref msg)) if msg == "too long"
        ));
    }

    #[test]
    fn test_into_struct_roundtrip() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Window {
            width: u32,
            title: String,
        }

        let schema = into_struct::<_, Window>(
            Schema::object()
                .field("width", Schema::number().integer())
                .field("title", Schema::string()),
        );

        let window = schema
            .parse(&json!({"width": 640, "title": "main", "extra": true}))
            .unwrap();
        assert_eq!(
            window,
            Window {
                width: 640,
                title: "main".to_string()
            }
        );
        assert_eq!(
            schema.to_json_value(&window).unwrap(),
            json!({"width": 640, "title": "main"})
        );
    }
}
