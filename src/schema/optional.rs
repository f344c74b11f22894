//! Wrappers that admit a missing or `null` value.
//!
//! All three wrap a schema `S` and produce `Option<S::Output>`; they differ in
//! which untyped values map to `None` and how `None` is written back:
//!
//! | Wrapper | decodes to `None` | encodes `None` as |
//! |---------|-------------------|-------------------|
//! | [`Optional`] | undefined | undefined |
//! | [`Nullable`] | `null` | `null` |
//! | [`AutoNullOptional`] | `null` or undefined | `null` |

use serde_json::Value;

use crate::context::DecodeContext;
use crate::error::{Decoded, EncodeError};
use crate::interop::json_schema::or_null;
use crate::interop::ToJsonSchema;

use super::traits::SchemaLike;

/// Accepts undefined in addition to whatever `S` accepts.
///
/// # Example
///
/// ```rust
/// use wireform::{DecodeContext, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::number().optional();
/// let mut ctx = DecodeContext::new();
///
/// assert!(schema.test(&None));
/// assert_eq!(schema.decode(None, &mut ctx), Ok(None));
/// assert!(schema.parse(&json!(null)).is_err());
/// ```
#[derive(Clone)]
pub struct Optional<S> {
    inner: S,
}

impl<S: SchemaLike> Optional<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SchemaLike> ToJsonSchema for Optional<S> {
    fn to_json_schema(&self) -> Value {
        // Optionality is expressed by the parent's `required` list.
        self.inner.to_json_schema()
    }
}

impl<S: SchemaLike> SchemaLike for Optional<S> {
    type Output = Option<S::Output>;

    fn test(&self, value: &Self::Output) -> bool {
        match value {
            None => true,
            Some(value) => self.inner.test(value),
        }
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<Self::Output> {
        match input {
            None => Ok(None),
            Some(_) => self.inner.decode(input, ctx).map(Some),
        }
    }

    fn encode(&self, value: &Self::Output) -> Result<Option<Value>, EncodeError> {
        match value {
            None => Ok(None),
            Some(value) => self.inner.encode(value),
        }
    }

    fn accepts_undefined(&self) -> bool {
        true
    }
}

/// Accepts `null` in addition to whatever `S` accepts.
#[derive(Clone)]
pub struct Nullable<S> {
    inner: S,
}

impl<S: SchemaLike> Nullable<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SchemaLike> ToJsonSchema for Nullable<S> {
    fn to_json_schema(&self) -> Value {
        or_null(self.inner.to_json_schema())
    }
}

impl<S: SchemaLike> SchemaLike for Nullable<S> {
    type Output = Option<S::Output>;

    fn test(&self, value: &Self::Output) -> bool {
        match value {
            None => true,
            Some(value) => self.inner.test(value),
        }
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<Self::Output> {
        match input {
            Some(Value::Null) => Ok(None),
            _ => self.inner.decode(input, ctx).map(Some),
        }
    }

    fn encode(&self, value: &Self::Output) -> Result<Option<Value>, EncodeError> {
        match value {
            None => Ok(Some(Value::Null)),
            Some(value) => self.inner.encode(value),
        }
    }

    fn accepts_undefined(&self) -> bool {
        self.inner.accepts_undefined()
    }
}

/// Reads both `null` and undefined as `None`, and always writes `null`.
///
/// Suited to fields that used to be absent and are now stored as `null`:
/// old documents decode, new documents carry an explicit `null`.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object().field("nickname", Schema::string().auto_null_optional());
///
/// let old = schema.parse(&json!({})).unwrap();
/// assert_eq!(schema.to_json_value(&old).unwrap(), json!({"nickname": null}));
/// ```
#[derive(Clone)]
pub struct AutoNullOptional<S> {
    inner: S,
}

impl<S: SchemaLike> AutoNullOptional<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SchemaLike> ToJsonSchema for AutoNullOptional<S> {
    fn to_json_schema(&self) -> Value {
        or_null(self.inner.to_json_schema())
    }
}

impl<S: SchemaLike> SchemaLike for AutoNullOptional<S> {
    type Output = Option<S::Output>;

    fn test(&self, value: &Self::Output) -> bool {
        match value {
            None => true,
            Some(value) => self.inner.test(value),
        }
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<Self::Output> {
        match input {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.inner.decode(input, ctx).map(Some),
        }
    }

    fn encode(&self, value: &Self::Output) -> Result<Option<Value>, EncodeError> {
        match value {
            None => Ok(Some(Value::Null)),
            Some(value) => self.inner.encode(value),
        }
    }

    fn accepts_undefined(&self) -> bool {
        true
    }
}
