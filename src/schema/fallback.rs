//! Wrappers that substitute a value instead of failing.
//!
//! [`Catch`] recovers from any decode failure; [`WithDefault`] only fills in a
//! missing value and still rejects malformed ones.

use serde_json::Value;

use crate::context::DecodeContext;
use crate::error::{DecodeFailure, Decoded, EncodeError};
use crate::interop::json_schema::with_keywords;
use crate::interop::ToJsonSchema;

use super::traits::SchemaLike;

/// Returns a fallback value whenever the inner schema fails to decode.
///
/// The inner issue stays recorded in the context but is never surfaced.
/// Used so malformed persisted data heals itself instead of failing the
/// caller.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let volume = Schema::number().catch(0.0);
/// assert_eq!(volume.parse(&json!("bad")).unwrap(), 0.0);
/// assert!(Schema::number().parse(&json!("bad")).is_err());
/// ```
#[derive(Clone)]
pub struct Catch<S: SchemaLike> {
    inner: S,
    fallback: S::Output,
}

impl<S: SchemaLike> Catch<S>
where
    S::Output: Clone + Send + Sync,
{
    /// Wraps `inner`, recovering with `fallback`.
    pub fn new(inner: S, fallback: S::Output) -> Self {
        Self { inner, fallback }
    }

    /// Returns the fallback value.
    pub fn fallback(&self) -> &S::Output {
        &self.fallback
    }
}

impl<S: SchemaLike> ToJsonSchema for Catch<S> {
    fn to_json_schema(&self) -> Value {
        self.inner.to_json_schema()
    }
}

impl<S: SchemaLike> SchemaLike for Catch<S>
where
    S::Output: Clone + Send + Sync,
{
    type Output = S::Output;

    fn test(&self, value: &S::Output) -> bool {
        self.inner.test(value)
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<S::Output> {
        match self.inner.decode(input, ctx) {
            Ok(value) => Ok(value),
            Err(DecodeFailure) => {
                if let Some(issue) = ctx.issue() {
                    tracing::debug!(
                        path = %issue.path,
                        message = %issue.message,
                        "decode failed, using fallback"
                    );
                }
                Ok(self.fallback.clone())
            }
        }
    }

    fn encode(&self, value: &S::Output) -> Result<Option<Value>, EncodeError> {
        self.inner.encode(value)
    }

    fn accepts_undefined(&self) -> bool {
        // A missing value decodes to the fallback.
        true
    }
}

/// Substitutes a default when the value is undefined.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let theme = Schema::object().field("theme", Schema::string().with_default("light".into()));
///
/// let value = theme.parse(&json!({})).unwrap();
/// assert_eq!(value["theme"], "light");
/// assert!(theme.parse(&json!({"theme": 3})).is_err());
/// ```
#[derive(Clone)]
pub struct WithDefault<S: SchemaLike> {
    inner: S,
    default: S::Output,
}

impl<S: SchemaLike> WithDefault<S>
where
    S::Output: Clone + Send + Sync,
{
    /// Wraps `inner`, filling in `default` for undefined.
    pub fn new(inner: S, default: S::Output) -> Self {
        Self { inner, default }
    }

    /// Returns the default value.
    pub fn default_value(&self) -> &S::Output {
        &self.default
    }
}

impl<S: SchemaLike> ToJsonSchema for WithDefault<S> {
    fn to_json_schema(&self) -> Value {
        let fragment = self.inner.to_json_schema();
        match self.inner.encode(&self.default) {
            Ok(Some(default)) => {
                with_keywords(fragment, serde_json::json!({ "default": default }))
            }
            _ => fragment,
        }
    }
}

impl<S: SchemaLike> SchemaLike for WithDefault<S>
where
    S::Output: Clone + Send + Sync,
{
    type Output = S::Output;

    fn test(&self, value: &S::Output) -> bool {
        self.inner.test(value)
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<S::Output> {
        match input {
            None => Ok(self.default.clone()),
            Some(_) => self.inner.decode(input, ctx),
        }
    }

    fn encode(&self, value: &S::Output) -> Result<Option<Value>, EncodeError> {
        self.inner.encode(value)
    }

    fn accepts_undefined(&self) -> bool {
        true
    }
}
