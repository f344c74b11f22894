//! String schema.
//!
//! This module provides [`StringSchema`] for string values with optional
//! length and regex pattern constraints.

use regex::Regex;
use serde_json::{json, Value};

use crate::context::DecodeContext;
use crate::error::{Decoded, EncodeError};
use crate::interop::json_schema::with_keywords;
use crate::interop::ToJsonSchema;

use super::traits::SchemaLike;

/// A constraint applied to string values.
#[derive(Clone, Debug)]
enum StringConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        message: Option<String>,
    },
}

impl StringConstraint {
    /// Returns the violation message if `value` breaks this constraint.
    fn check(&self, value: &str) -> Option<String> {
        match self {
            StringConstraint::MinLength { min, message } => {
                let len = value.chars().count();
                (len < *min).then(|| {
                    message
                        .clone()
                        .unwrap_or_else(|| format!("length must be at least {}, got {}", min, len))
                })
            }
            StringConstraint::MaxLength { max, message } => {
                let len = value.chars().count();
                (len > *max).then(|| {
                    message
                        .clone()
                        .unwrap_or_else(|| format!("length must be at most {}, got {}", max, len))
                })
            }
            StringConstraint::Pattern { regex, message } => (!regex.is_match(value)).then(|| {
                message
                    .clone()
                    .unwrap_or_else(|| format!("must match pattern '{}'", regex.as_str()))
            }),
        }
    }
}

/// A schema for string values.
///
/// Constraints are checked in the order they were added and the first
/// violation is reported.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string()
///     .min_len(3)
///     .max_len(20)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// assert_eq!(schema.parse(&json!("alice")).unwrap(), "alice");
///
/// let err = schema.parse(&json!("AB")).unwrap_err();
/// assert_eq!(err.message, "length must be at least 3, got 2");
/// ```
#[derive(Clone, Debug, Default)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    type_error_message: Option<String>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a minimum length constraint.
    ///
    /// The string must have at least `min` characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints.push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length constraint.
    ///
    /// The string must have at most `max` characters (Unicode scalar values).
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints.push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Adds a regex pattern constraint.
    ///
    /// Returns an error if the pattern is not a valid regular expression.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wireform::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let digits = Schema::string().pattern(r"^\d+$").unwrap();
    ///
    /// assert!(digits.parse(&json!("12345")).is_ok());
    /// assert_eq!(
    ///     digits.parse(&json!("abc")).unwrap_err().message,
    ///     r"must match pattern '^\d+$'"
    /// );
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            message: None,
        });
        Ok(self)
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this replaces the type error
    /// message (`expect string`).
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(StringConstraint::MinLength { message: m, .. })
            | Some(StringConstraint::MaxLength { message: m, .. })
            | Some(StringConstraint::Pattern { message: m, .. }) => *m = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }

    fn first_violation(&self, value: &str) -> Option<String> {
        self.constraints.iter().find_map(|c| c.check(value))
    }
}

impl ToJsonSchema for StringSchema {
    fn to_json_schema(&self) -> Value {
        let mut schema = json!({ "type": "string" });
        for constraint in &self.constraints {
            let extra = match constraint {
                StringConstraint::MinLength { min, .. } => json!({ "minLength": min }),
                StringConstraint::MaxLength { max, .. } => json!({ "maxLength": max }),
                StringConstraint::Pattern { regex, .. } => json!({ "pattern": regex.as_str() }),
            };
            schema = with_keywords(schema, extra);
        }
        schema
    }
}

impl SchemaLike for StringSchema {
    type Output = String;

    fn test(&self, value: &String) -> bool {
        self.first_violation(value).is_none()
    }

    fn decode(&self, input: Option<&Value>, ctx: &mut DecodeContext) -> Decoded<String> {
        let Some(s) = input.and_then(Value::as_str) else {
            let message = self
                .type_error_message
                .clone()
                .unwrap_or_else(|| "expect string".to_string());
            return Err(ctx.fail(message));
        };

        match self.first_violation(s) {
            Some(message) => Err(ctx.fail(message)),
            None => Ok(s.to_string()),
        }
    }

    fn encode(&self, value: &String) -> Result<Option<Value>, EncodeError> {
        Ok(Some(Value::String(value.clone())))
    }
}
