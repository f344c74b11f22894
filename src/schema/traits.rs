//! The schema contract.
//!
//! [`SchemaLike`] is the uniform test/decode/encode record every combinator
//! produces and consumes. [`ValueSchema`] is its type-erased form, used where
//! schemas with different output types must sit side by side (object fields,
//! intersection members, registry entries).

use std::sync::Arc;

use serde_json::Value;

use crate::context::{DecodeContext, ParseOptions};
use crate::error::{DecodeFailure, Decoded, EncodeError, ParseJsonError, ValidationError};
use crate::interop::ToJsonSchema;

use super::fallback::{Catch, WithDefault};
use super::optional::{AutoNullOptional, Nullable, Optional};
use super::primitive::json_eq;
use super::transform::{Transform, TryTransform};

/// A boxed schema with a known output type.
pub type BoxedSchema<T> = Box<dyn SchemaLike<Output = T>>;

/// A composable schema for one output type.
///
/// Undefined (a missing object key, or no value at all) is `None` on both
/// sides: `decode` receives `Option<&Value>` and `encode` returns
/// `Option<Value>`. JSON `null` is `Some(Value::Null)`.
///
/// Implementations must keep three promises:
/// - `decode` records exactly one issue in the context before it fails;
/// - `encode` never needs a context and only fails on contract violations;
/// - whenever `test(v)` holds, `decode(encode(v))` succeeds and yields `v`.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string())
///     .field("tags", Schema::array(Schema::string()).optional());
///
/// let settings = schema.parse(&json!({"name": "main"})).unwrap();
/// assert_eq!(schema.stringify_json(&settings).unwrap(), r#"{"name":"main"}"#);
///
/// let err = schema.parse(&json!({"name": 1})).unwrap_err();
/// assert_eq!(err.to_string(), "$.name: expect string");
/// ```
pub trait SchemaLike: ToJsonSchema + Send + Sync {
    /// The typed value produced by a successful decode.
    type Output;

    /// Returns true if `value` is a valid output of this schema.
    fn test(&self, value: &Self::Output) -> bool;

    /// Decodes an untyped value, recording an issue in `ctx` on failure.
    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<Self::Output>;

    /// Encodes a valid output back into its untyped form.
    ///
    /// `Ok(None)` means the value encodes to undefined.
    fn encode(&self, value: &Self::Output) -> Result<Option<Value>, EncodeError>;

    /// Returns true if this schema accepts a missing value.
    ///
    /// Object keys whose schema accepts undefined are optional.
    fn accepts_undefined(&self) -> bool {
        false
    }

    /// Decodes `input`, converting a failure into a [`ValidationError`].
    fn parse(&self, input: &Value) -> Result<Self::Output, ValidationError> {
        self.parse_with(Some(input), &ParseOptions::default())
    }

    /// Decodes a possibly-undefined `input` with explicit options.
    fn parse_with(
        &self,
        input: Option<&Value>,
        options: &ParseOptions,
    ) -> Result<Self::Output, ValidationError> {
        let mut ctx = DecodeContext::with_options(options);
        match self.decode(input, &mut ctx) {
            Ok(value) => Ok(value),
            Err(DecodeFailure) => Err(ctx.into_error()),
        }
    }

    /// Parses `text` as JSON, then decodes it.
    fn parse_json(&self, text: &str) -> Result<Self::Output, ParseJsonError> {
        let input: Value = serde_json::from_str(text)?;
        Ok(self.parse(&input)?)
    }

    /// Encodes `value` into a JSON value.
    fn to_json_value(&self, value: &Self::Output) -> Result<Value, EncodeError> {
        self.encode(value)?.ok_or(EncodeError::UndefinedRoot)
    }

    /// Encodes `value` into JSON text. The value is not validated.
    fn stringify_json(&self, value: &Self::Output) -> Result<String, EncodeError> {
        let encoded = self.to_json_value(value)?;
        Ok(serde_json::to_string(&encoded)?)
    }

    /// Accepts undefined in addition to what this schema accepts.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional::new(self)
    }

    /// Accepts `null` in addition to what this schema accepts.
    fn nullable(self) -> Nullable<Self>
    where
        Self: Sized,
    {
        Nullable::new(self)
    }

    /// Decodes both `null` and undefined to `None`; encodes `None` as `null`.
    fn auto_null_optional(self) -> AutoNullOptional<Self>
    where
        Self: Sized,
    {
        AutoNullOptional::new(self)
    }

    /// Replaces any decode failure with `fallback`.
    fn catch(self, fallback: Self::Output) -> Catch<Self>
    where
        Self: Sized,
        Self::Output: Clone + Send + Sync,
    {
        Catch::new(self, fallback)
    }

    /// Decodes undefined to `default`; anything else must still decode.
    fn with_default(self, default: Self::Output) -> WithDefault<Self>
    where
        Self: Sized,
        Self::Output: Clone + Send + Sync,
    {
        WithDefault::new(self, default)
    }

    /// Maps the output through a caller-supplied pair of inverse functions.
    fn transform<T, P, D, E>(self, test: P, decode: D, encode: E) -> Transform<Self, T>
    where
        Self: Sized,
        P: Fn(&T) -> bool + Send + Sync + 'static,
        D: Fn(Self::Output) -> T + Send + Sync + 'static,
        E: Fn(&T) -> Self::Output + Send + Sync + 'static,
    {
        Transform::new(self, test, decode, encode)
    }

    /// Like [`transform`](SchemaLike::transform), with fallible directions.
    fn try_transform<T, D, E>(self, decode: D, encode: E) -> TryTransform<Self, T>
    where
        Self: Sized,
        D: Fn(Self::Output) -> Result<T, String> + Send + Sync + 'static,
        E: Fn(&T) -> Result<Self::Output, String> + Send + Sync + 'static,
    {
        TryTransform::new(self, decode, encode)
    }

    /// Boxes this schema, keeping its output type.
    fn boxed(self) -> BoxedSchema<Self::Output>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Erases this schema's output type to its wire form.
    fn erase(self) -> Erased
    where
        Self: Sized + 'static,
    {
        Erased::new(self)
    }
}

impl<T> ToJsonSchema for BoxedSchema<T> {
    fn to_json_schema(&self) -> Value {
        (**self).to_json_schema()
    }
}

impl<T> SchemaLike for BoxedSchema<T> {
    type Output = T;

    fn test(&self, value: &T) -> bool {
        (**self).test(value)
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<T> {
        (**self).decode(input, ctx)
    }

    fn encode(&self, value: &T) -> Result<Option<Value>, EncodeError> {
        (**self).encode(value)
    }

    fn accepts_undefined(&self) -> bool {
        (**self).accepts_undefined()
    }
}

/// A type-erased schema that works on wire-form values.
///
/// The wire form of a value is what its schema encodes it to. Decoding
/// through a `ValueSchema` decodes with the underlying schema and encodes the
/// result straight back, so the output is normalised: defaults and fallbacks
/// filled in, `null`/undefined collapsed where the schema collapses them.
///
/// Every [`SchemaLike`] is a `ValueSchema`.
pub trait ValueSchema: ToJsonSchema + Send + Sync {
    /// Returns true if `value` decodes to an output that passes `test` and
    /// is already in wire form.
    fn test_value(&self, value: Option<&Value>) -> bool;

    /// Decodes `input` and returns its wire form.
    fn decode_value(
        &self,
        input: Option<&Value>,
        ctx: &mut DecodeContext,
    ) -> Decoded<Option<Value>>;

    /// Re-encodes a wire-form value.
    fn encode_value(&self, value: Option<&Value>) -> Result<Option<Value>, EncodeError>;

    /// Returns true if the underlying schema accepts undefined.
    fn accepts_undefined_value(&self) -> bool;
}

impl<S: SchemaLike> ValueSchema for S {
    fn test_value(&self, value: Option<&Value>) -> bool {
        let mut scratch = DecodeContext::new();
        let Ok(decoded) = self.decode(value, &mut scratch) else {
            return false;
        };
        if !self.test(&decoded) {
            return false;
        }
        // The value must already be in wire form, or encoding would change it.
        match (self.encode(&decoded), value) {
            (Ok(Some(encoded)), Some(value)) => json_eq(&encoded, value),
            (Ok(None), None) => true,
            _ => false,
        }
    }

    fn decode_value(
        &self,
        input: Option<&Value>,
        ctx: &mut DecodeContext,
    ) -> Decoded<Option<Value>> {
        let decoded = self.decode(input, ctx)?;
        self.encode(&decoded).map_err(|err| ctx.fail(err.to_string()))
    }

    fn encode_value(&self, value: Option<&Value>) -> Result<Option<Value>, EncodeError> {
        let mut scratch = DecodeContext::new();
        match self.decode(value, &mut scratch) {
            Ok(decoded) => self.encode(&decoded),
            Err(DecodeFailure) => Err(EncodeError::Invalid(scratch.into_issue())),
        }
    }

    fn accepts_undefined_value(&self) -> bool {
        self.accepts_undefined()
    }
}

/// A [`ValueSchema`] viewed as a schema whose output is its wire form.
///
/// Erasing lets schemas with different output types share a union.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let id = Schema::union(vec![
///     Schema::string().erase().boxed(),
///     Schema::number().erase().boxed(),
/// ]);
///
/// assert_eq!(id.parse(&json!(7)).unwrap(), Some(json!(7)));
/// assert!(id.parse(&json!(true)).is_err());
/// ```
#[derive(Clone)]
pub struct Erased {
    inner: Arc<dyn ValueSchema>,
}

impl Erased {
    /// Erases `schema`.
    pub fn new<S: SchemaLike + 'static>(schema: S) -> Self {
        Self {
            inner: Arc::new(schema),
        }
    }

    /// Wraps an already-erased schema.
    pub fn from_arc(inner: Arc<dyn ValueSchema>) -> Self {
        Self { inner }
    }

    /// Returns the erased schema.
    pub fn inner(&self) -> &Arc<dyn ValueSchema> {
        &self.inner
    }
}

impl ToJsonSchema for Erased {
    fn to_json_schema(&self) -> Value {
        self.inner.to_json_schema()
    }
}

impl SchemaLike for Erased {
    type Output = Option<Value>;

    fn test(&self, value: &Option<Value>) -> bool {
        self.inner.test_value(value.as_ref())
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<Option<Value>> {
        self.inner.decode_value(input, ctx)
    }

    fn encode(&self, value: &Option<Value>) -> Result<Option<Value>, EncodeError> {
        self.inner.encode_value(value.as_ref())
    }

    fn accepts_undefined(&self) -> bool {
        self.inner.accepts_undefined_value()
    }
}
