//! Array schema.
//!
//! This module provides [`ArraySchema`] for homogeneous arrays with an item
//! schema and optional length constraints.

use serde_json::{json, Value};

use crate::context::DecodeContext;
use crate::error::{Decoded, EncodeError};
use crate::interop::json_schema::with_keywords;
use crate::interop::ToJsonSchema;

use super::traits::SchemaLike;

/// A constraint applied to array length.
#[derive(Clone, Debug)]
enum ArrayConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
}

impl ArrayConstraint {
    fn check(&self, len: usize) -> Option<String> {
        match self {
            ArrayConstraint::MinLength { min, message } => (len < *min).then(|| {
                message.clone().unwrap_or_else(|| {
                    format!("array must have at least {} items, got {}", min, len)
                })
            }),
            ArrayConstraint::MaxLength { max, message } => (len > *max).then(|| {
                message.clone().unwrap_or_else(|| {
                    format!("array must have at most {} items, got {}", max, len)
                })
            }),
        }
    }
}

/// A schema for arrays whose items all match one schema.
///
/// Length constraints are checked first, then items are decoded in order
/// under their index. The first failing item aborts the decode; no partial
/// array is produced.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::array(Schema::string().min_len(1))
///     .non_empty()
///     .max_len(10);
///
/// assert_eq!(schema.parse(&json!(["a", "b"])).unwrap(), vec!["a", "b"]);
///
/// let err = schema.parse(&json!(["a", ""])).unwrap_err();
/// assert_eq!(err.path.to_string(), "$.1");
///
/// assert!(schema.parse(&json!([])).is_err());
/// ```
#[derive(Clone)]
pub struct ArraySchema<S> {
    item_schema: S,
    constraints: Vec<ArrayConstraint>,
    type_error_message: Option<String>,
}

impl<S: SchemaLike> ArraySchema<S> {
    /// Creates an array schema with the given item schema.
    pub fn new(item_schema: S) -> Self {
        Self {
            item_schema,
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Returns the item schema.
    pub fn item_schema(&self) -> &S {
        &self.item_schema
    }

    /// Requires at least `min` items.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MinLength { min, message: None });
        self
    }

    /// Allows at most `max` items.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MaxLength { max, message: None });
        self
    }

    /// Requires at least one item.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this replaces the type error
    /// message (`expect array`).
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(ArrayConstraint::MinLength { message: m, .. })
            | Some(ArrayConstraint::MaxLength { message: m, .. }) => *m = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }

    fn length_violation(&self, len: usize) -> Option<String> {
        self.constraints.iter().find_map(|c| c.check(len))
    }
}

impl<S: SchemaLike> ToJsonSchema for ArraySchema<S> {
    fn to_json_schema(&self) -> Value {
        let mut schema = json!({
            "type": "array",
            "items": self.item_schema.to_json_schema()
        });
        for constraint in &self.constraints {
            let extra = match constraint {
                ArrayConstraint::MinLength { min, .. } => json!({ "minItems": min }),
                ArrayConstraint::MaxLength { max, .. } => json!({ "maxItems": max }),
            };
            schema = with_keywords(schema, extra);
        }
        schema
    }
}

impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    type Output = Vec<S::Output>;

    fn test(&self, value: &Vec<S::Output>) -> bool {
        // An item that encodes to undefined is written as null and would not decode back.
        self.length_violation(value.len()).is_none()
            && value.iter().all(|item| {
                self.item_schema.test(item)
                    && !matches!(self.item_schema.encode(item), Ok(None))
            })
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<Vec<S::Output>> {
        let Some(items) = input.and_then(Value::as_array) else {
            let message = self
                .type_error_message
                .clone()
                .unwrap_or_else(|| "expect array".to_string());
            return Err(ctx.fail(message));
        };

        if let Some(message) = self.length_violation(items.len()) {
            return Err(ctx.fail(message));
        }

        let mut decoded = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut scope = ctx.enter(index)?;
            decoded.push(self.item_schema.decode(Some(item), &mut scope)?);
        }
        Ok(decoded)
    }

    fn encode(&self, value: &Vec<S::Output>) -> Result<Option<Value>, EncodeError> {
        let mut items = Vec::with_capacity(value.len());
        for item in value {
            items.push(self.item_schema.encode(item)?.unwrap_or(Value::Null));
        }
        Ok(Some(Value::Array(items)))
    }
}
