//! Numeric schemas.
//!
//! This module provides [`NumberSchema`] for JSON numbers decoded as `f64`
//! with optional range and integrality constraints, and [`BigIntSchema`] for
//! integers that must be carried exactly.

use serde_json::{json, Number, Value};
use std::ops::RangeInclusive;

use crate::context::DecodeContext;
use crate::error::{Decoded, EncodeError};
use crate::interop::json_schema::with_keywords;
use crate::interop::ToJsonSchema;

use super::traits::SchemaLike;

/// Largest integer an `f64` holds without loss.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A constraint applied to number values.
#[derive(Clone, Debug)]
enum NumberConstraint {
    Min { value: f64, message: Option<String> },
    Max { value: f64, message: Option<String> },
    Integer { message: Option<String> },
}

impl NumberConstraint {
    fn holds(&self, n: f64) -> bool {
        match self {
            NumberConstraint::Min { value, .. } => n >= *value,
            NumberConstraint::Max { value, .. } => n <= *value,
            NumberConstraint::Integer { .. } => n.fract() == 0.0,
        }
    }

    fn message(&self, n: f64) -> String {
        match self {
            NumberConstraint::Min { value, message } => message
                .clone()
                .unwrap_or_else(|| format!("must be at least {}, got {}", value, n)),
            NumberConstraint::Max { value, message } => message
                .clone()
                .unwrap_or_else(|| format!("must be at most {}, got {}", value, n)),
            NumberConstraint::Integer { message } => message
                .clone()
                .unwrap_or_else(|| format!("must be an integer, got {}", n)),
        }
    }
}

/// A schema for JSON numbers.
///
/// Decodes any JSON number to `f64` and checks constraints in the order they
/// were added; the first violated constraint is reported. Integral values
/// encode back as JSON integers, so `3.0` is written as `3`.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::number().min(0.0).max(100.0);
///
/// assert_eq!(schema.parse(&json!(50)).unwrap(), 50.0);
/// let err = schema.parse(&json!(150)).unwrap_err();
/// assert_eq!(err.to_string(), "$: must be at most 100, got 150");
/// ```
#[derive(Clone, Debug, Default)]
pub struct NumberSchema {
    constraints: Vec<NumberConstraint>,
    type_error_message: Option<String>,
}

impl NumberSchema {
    /// Creates a new number schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a minimum value constraint (inclusive).
    pub fn min(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// Adds a maximum value constraint (inclusive).
    pub fn max(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Adds both minimum and maximum value constraints (inclusive range).
    ///
    /// Equivalent to calling `.min(start).max(end)`.
    pub fn range(self, range: RangeInclusive<f64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    /// Requires the number to have no fractional part.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wireform::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let port = Schema::number().integer().range(1.0..=65535.0);
    ///
    /// assert!(port.parse(&json!(8080)).is_ok());
    /// assert!(port.parse(&json!(80.5)).is_err());
    /// ```
    pub fn integer(mut self) -> Self {
        self.constraints
            .push(NumberConstraint::Integer { message: None });
        self
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this replaces the type error
    /// message (`expect number`).
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(NumberConstraint::Min { message: m, .. })
            | Some(NumberConstraint::Max { message: m, .. })
            | Some(NumberConstraint::Integer { message: m }) => *m = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }

    fn first_violation(&self, n: f64) -> Option<&NumberConstraint> {
        self.constraints.iter().find(|c| !c.holds(n))
    }
}

impl ToJsonSchema for NumberSchema {
    fn to_json_schema(&self) -> Value {
        let integral = self
            .constraints
            .iter()
            .any(|c| matches!(c, NumberConstraint::Integer { .. }));
        let kind = if integral { "integer" } else { "number" };
        let mut schema = json!({ "type": kind });

        for constraint in &self.constraints {
            let extra = match constraint {
                NumberConstraint::Min { value, .. } => json!({ "minimum": number_to_value(*value) }),
                NumberConstraint::Max { value, .. } => json!({ "maximum": number_to_value(*value) }),
                NumberConstraint::Integer { .. } => continue,
            };
            schema = with_keywords(schema, extra);
        }
        schema
    }
}

impl SchemaLike for NumberSchema {
    type Output = f64;

    fn test(&self, value: &f64) -> bool {
        value.is_finite() && self.first_violation(*value).is_none()
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<f64> {
        let n = match input {
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        };
        let Some(n) = n else {
            let message = self
                .type_error_message
                .clone()
                .unwrap_or_else(|| "expect number".to_string());
            return Err(ctx.fail(message));
        };

        match self.first_violation(n) {
            Some(constraint) => Err(ctx.fail(constraint.message(n))),
            None => Ok(n),
        }
    }

    fn encode(&self, value: &f64) -> Result<Option<Value>, EncodeError> {
        number_to_value(*value)
            .map(Some)
            .ok_or(EncodeError::NonFiniteNumber(*value))
    }
}

/// Converts a finite `f64` to a JSON number, preferring an integer form.
pub(crate) fn number_to_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

/// A schema for integers carried exactly as `i128`.
///
/// Accepts JSON integers in the signed or unsigned 64-bit range; floats are
/// rejected even when integral.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::bigint();
///
/// assert_eq!(schema.parse(&json!(u64::MAX)).unwrap(), u64::MAX as i128);
/// assert!(schema.parse(&json!(1.5)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct BigIntSchema;

impl BigIntSchema {
    /// Creates a new bigint schema.
    pub fn new() -> Self {
        Self
    }
}

impl ToJsonSchema for BigIntSchema {
    fn to_json_schema(&self) -> Value {
        json!({ "type": "integer" })
    }
}

impl SchemaLike for BigIntSchema {
    type Output = i128;

    fn test(&self, value: &i128) -> bool {
        *value >= i64::MIN as i128 && *value <= u64::MAX as i128
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<i128> {
        match input {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Ok(i as i128);
                }
                if let Some(u) = n.as_u64() {
                    return Ok(u as i128);
                }
                Err(ctx.fail("expect bigint"))
            }
            _ => Err(ctx.fail("expect bigint")),
        }
    }

    fn encode(&self, value: &i128) -> Result<Option<Value>, EncodeError> {
        if let Ok(i) = i64::try_from(*value) {
            return Ok(Some(Value::from(i)));
        }
        match u64::try_from(*value) {
            Ok(u) => Ok(Some(Value::from(u))),
            Err(_) => Err(EncodeError::BigIntOutOfRange(*value)),
        }
    }
}
