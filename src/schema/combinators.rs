//! Schema combinators that compose several schemas over one value.
//!
//! - [`UnionSchema`]: the first alternative that decodes wins
//! - [`IntersectionSchema`]: every member decodes the same object and the
//!   results are merged
//!
//! # Example
//!
//! ```rust
//! use wireform::{Schema, SchemaLike};
//! use serde_json::json;
//!
//! let mode = Schema::union(vec![
//!     Schema::literal("auto").boxed(),
//!     Schema::literal("manual").boxed(),
//! ]);
//! assert_eq!(mode.parse(&json!("manual")).unwrap(), "manual");
//!
//! let named = Schema::object().field("name", Schema::string());
//! let aged = Schema::object().field("age", Schema::number());
//! let person = Schema::intersection(named, aged);
//! let value = person.parse(&json!({"name": "Ada", "age": 36})).unwrap();
//! assert_eq!(value.len(), 2);
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::context::DecodeContext;
use crate::error::{DecodeFailure, Decoded, EncodeError};
use crate::interop::ToJsonSchema;

use super::primitive::json_eq;
use super::traits::{BoxedSchema, SchemaLike, ValueSchema};
use super::transform::{self, TryTransform};

/// Tries alternatives in order; the first one that decodes wins.
///
/// Every alternative decodes into a scratch context, so a rejected
/// alternative leaves no trace in the caller's context. When all of them fail
/// a single issue is recorded and the individual reasons are discarded.
///
/// Encoding picks the first alternative whose `test` accepts the value. With
/// overlapping alternatives that may differ from the one that decoded it.
pub struct UnionSchema<T> {
    alternatives: Vec<BoxedSchema<T>>,
}

impl<T> UnionSchema<T> {
    /// Creates a union of `alternatives`, tried in order.
    pub fn new(alternatives: Vec<BoxedSchema<T>>) -> Self {
        Self { alternatives }
    }

    /// Appends an alternative.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wireform::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let size = Schema::union(vec![Schema::literal("small").boxed()])
    ///     .or(Schema::literal("large"));
    ///
    /// assert!(size.parse(&json!("large")).is_ok());
    /// assert_eq!(
    ///     size.parse(&json!("medium")).unwrap_err().message,
    ///     "all union alternatives failed"
    /// );
    /// ```
    pub fn or<S>(mut self, alternative: S) -> Self
    where
        S: SchemaLike<Output = T> + 'static,
    {
        self.alternatives.push(Box::new(alternative));
        self
    }

    /// Returns the number of alternatives.
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Returns true if there are no alternatives.
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl<T> ToJsonSchema for UnionSchema<T> {
    fn to_json_schema(&self) -> Value {
        let alternatives: Vec<Value> = self
            .alternatives
            .iter()
            .map(|alternative| alternative.to_json_schema())
            .collect();
        json!({ "anyOf": alternatives })
    }
}

impl<T> SchemaLike for UnionSchema<T> {
    type Output = T;

    fn test(&self, value: &T) -> bool {
        self.alternatives.iter().any(|alternative| alternative.test(value))
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<T> {
        for (index, alternative) in self.alternatives.iter().enumerate() {
            let mut scratch = ctx.scratch();
            match alternative.decode(input, &mut scratch) {
                Ok(value) => return Ok(value),
                Err(DecodeFailure) => {
                    if let Some(issue) = scratch.issue() {
                        tracing::trace!(
                            alternative = index,
                            path = %issue.path,
                            message = %issue.message,
                            "union alternative rejected"
                        );
                    }
                }
            }
        }
        Err(ctx.fail("all union alternatives failed"))
    }

    fn encode(&self, value: &T) -> Result<Option<Value>, EncodeError> {
        match self.alternatives.iter().find(|alternative| alternative.test(value)) {
            Some(alternative) => alternative.encode(value),
            None => Err(EncodeError::NoMatchingAlternative),
        }
    }

    fn accepts_undefined(&self) -> bool {
        self.alternatives
            .iter()
            .any(|alternative| alternative.accepts_undefined())
    }
}

/// Decodes one object with several object-shaped schemas and merges the
/// results.
///
/// Every member sees the same raw input and must produce an object. A key
/// produced by more than one member is an error, on decode and on encode.
#[derive(Clone)]
pub struct IntersectionSchema {
    members: Vec<Arc<dyn ValueSchema>>,
}

impl IntersectionSchema {
    /// Creates an intersection of two schemas.
    pub fn new<A, B>(first: A, second: B) -> Self
    where
        A: SchemaLike + 'static,
        B: SchemaLike + 'static,
    {
        let first: Arc<dyn ValueSchema> = Arc::new(first);
        let second: Arc<dyn ValueSchema> = Arc::new(second);
        Self {
            members: vec![first, second],
        }
    }

    /// Adds another member.
    pub fn and<S>(mut self, member: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.members.push(Arc::new(member));
        self
    }

    /// Converts decoded objects into `T` through serde.
    pub fn into_struct<T>(self) -> TryTransform<Self, T>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        transform::into_struct(self)
    }
}

impl ToJsonSchema for IntersectionSchema {
    fn to_json_schema(&self) -> Value {
        let members: Vec<Value> = self
            .members
            .iter()
            .map(|member| member.to_json_schema())
            .collect();
        json!({ "allOf": members })
    }
}

impl SchemaLike for IntersectionSchema {
    type Output = Map<String, Value>;

    fn test(&self, value: &Map<String, Value>) -> bool {
        let input = Value::Object(value.clone());
        let members_pass = self.members.iter().all(|member| {
            let mut scratch = DecodeContext::new();
            match member.decode_value(Some(&input), &mut scratch) {
                Ok(part) => member.test_value(part.as_ref()),
                Err(DecodeFailure) => false,
            }
        });
        // Unclaimed keys and values not in wire form would change on the way back.
        members_pass && matches!(self.encode(value), Ok(Some(ref encoded)) if json_eq(encoded, &input))
    }

    fn decode(
        &self,
        input: Option<&Value>,
        ctx: &mut DecodeContext,
    ) -> Decoded<Map<String, Value>> {
        let mut merged = Map::new();
        for member in &self.members {
            let Some(Value::Object(part)) = member.decode_value(input, ctx)? else {
                return Err(ctx.fail("expect object from intersection member"));
            };
            for (key, value) in part {
                if merged.contains_key(&key) {
                    return Err(ctx.fail(format!("duplicate key \"{}\" in intersection", key)));
                }
                merged.insert(key, value);
            }
        }
        Ok(merged)
    }

    fn encode(&self, value: &Map<String, Value>) -> Result<Option<Value>, EncodeError> {
        let input = Value::Object(value.clone());
        let mut merged = Map::new();
        for member in &self.members {
            let Some(Value::Object(part)) = member.encode_value(Some(&input))? else {
                return Err(EncodeError::NonObjectMember);
            };
            for (key, value) in part {
                if merged.contains_key(&key) {
                    return Err(EncodeError::DuplicateKey(key));
                }
                merged.insert(key, value);
            }
        }
        Ok(Some(Value::Object(merged)))
    }
}
