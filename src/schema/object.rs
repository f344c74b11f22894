//! Object schema.
//!
//! This module provides [`ObjectSchema`] for JSON objects with a declared set
//! of fields. Field schemas are stored type-erased so fields of different
//! output types can sit in one object; the decoded output is the object's
//! normalised wire form.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::context::DecodeContext;
use crate::error::{Decoded, EncodeError};
use crate::interop::ToJsonSchema;

use super::traits::{SchemaLike, ValueSchema};
use super::transform::{self, TryTransform};

/// A schema for JSON objects with declared fields.
///
/// A field is required unless its schema accepts undefined, so optionality
/// comes from the field schema itself (`optional`, `with_default`, `catch`,
/// `auto_null_optional`). Fields are decoded in declaration order and the
/// first failing field aborts the decode. Unknown keys are ignored unless
/// [`deny_unknown_keys`](ObjectSchema::deny_unknown_keys) is set, and are
/// never carried into the output.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::number().integer().min(0.0))
///     .field("email", Schema::string().optional());
///
/// let user = schema.parse(&json!({"name": "Alice", "age": 30, "admin": true})).unwrap();
/// assert_eq!(user, *json!({"name": "Alice", "age": 30}).as_object().unwrap());
///
/// let err = schema.parse(&json!({"name": "Alice"})).unwrap_err();
/// assert_eq!(err.to_string(), "$.age: expect number");
/// ```
#[derive(Clone, Default)]
pub struct ObjectSchema {
    fields: IndexMap<String, Arc<dyn ValueSchema>>,
    deny_unknown_keys: bool,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    /// Creates a new object schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field.
    ///
    /// Declaring the same name twice replaces the earlier schema but keeps
    /// its position.
    pub fn field<S>(self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.shared_field(name, Arc::new(schema))
    }

    /// Declares a field backed by an already-erased schema.
    pub fn shared_field(mut self, name: impl Into<String>, schema: Arc<dyn ValueSchema>) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Rejects input objects carrying keys that are not declared.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wireform::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let strict = Schema::object()
    ///     .field("name", Schema::string())
    ///     .deny_unknown_keys();
    ///
    /// let err = strict.parse(&json!({"name": "Alice", "role": "admin"})).unwrap_err();
    /// assert_eq!(err.to_string(), "$.role: unknown key");
    /// ```
    pub fn deny_unknown_keys(mut self) -> Self {
        self.deny_unknown_keys = true;
        self
    }

    /// Sets a custom error message for non-object input.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    /// Returns the declared field names, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the schema declared for `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ValueSchema>> {
        self.fields.get(name)
    }

    /// Returns the names of fields that must be present.
    pub fn required_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, schema)| !schema.accepts_undefined_value())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Returns the names of fields that may be absent.
    pub fn optional_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, schema)| schema.accepts_undefined_value())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Converts decoded objects into `T` through serde.
    ///
    /// A decoded object that `T` cannot be deserialised from fails with the
    /// serde error as the issue message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde::{Deserialize, Serialize};
    /// use wireform::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// #[derive(Debug, PartialEq, Serialize, Deserialize)]
    /// struct Account {
    ///     id: u64,
    ///     label: Option<String>,
    /// }
    ///
    /// let schema = Schema::object()
    ///     .field("id", Schema::number().integer().min(0.0))
    ///     .field("label", Schema::string().auto_null_optional())
    ///     .into_struct::<Account>();
    ///
    /// let account = schema.parse(&json!({"id": 7})).unwrap();
    /// assert_eq!(account, Account { id: 7, label: None });
    /// assert_eq!(schema.stringify_json(&account).unwrap(), r#"{"id":7,"label":null}"#);
    /// ```
    pub fn into_struct<T>(self) -> TryTransform<Self, T>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        transform::into_struct(self)
    }

    fn type_error(&self) -> String {
        self.type_error_message
            .clone()
            .unwrap_or_else(|| "expect object".to_string())
    }
}

impl ToJsonSchema for ObjectSchema {
    fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_json_schema()))
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties
        });
        if let Some(obj) = schema.as_object_mut() {
            let required = self.required_keys();
            if !required.is_empty() {
                obj.insert("required".to_string(), json!(required));
            }
            if self.deny_unknown_keys {
                obj.insert("additionalProperties".to_string(), Value::Bool(false));
            }
        }
        schema
    }
}

impl SchemaLike for ObjectSchema {
    type Output = Map<String, Value>;

    fn test(&self, value: &Map<String, Value>) -> bool {
        value.keys().all(|key| self.fields.contains_key(key))
            && self
                .fields
                .iter()
                .all(|(name, schema)| schema.test_value(value.get(name)))
    }

    fn decode(
        &self,
        input: Option<&Value>,
        ctx: &mut DecodeContext,
    ) -> Decoded<Map<String, Value>> {
        let Some(object) = input.and_then(Value::as_object) else {
            return Err(ctx.fail(self.type_error()));
        };

        if self.deny_unknown_keys {
            if let Some(unknown) = object.keys().find(|key| !self.fields.contains_key(*key)) {
                let mut scope = ctx.enter(unknown.as_str())?;
                return Err(scope.fail("unknown key"));
            }
        }

        let mut decoded = Map::new();
        for (name, schema) in &self.fields {
            let mut scope = ctx.enter(name.as_str())?;
            if let Some(value) = schema.decode_value(object.get(name), &mut scope)? {
                decoded.insert(name.clone(), value);
            }
        }
        Ok(decoded)
    }

    fn encode(&self, value: &Map<String, Value>) -> Result<Option<Value>, EncodeError> {
        let mut encoded = Map::new();
        for (name, schema) in &self.fields {
            if let Some(field) = schema.encode_value(value.get(name))? {
                encoded.insert(name.clone(), field);
            }
        }
        Ok(Some(Value::Object(encoded)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;

    fn profile() -> ObjectSchema {
        Schema::object()
            .field("name", Schema::string())
            .field("tags", Schema::array(Schema::string()).optional())
            .field("theme", Schema::string().with_default("light".to_string()))
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_rejects_non_object() {
        for input in [json!([]), json!("{}"), json!(null)] {
            let err = profile().parse(&input).unwrap_err();
            assert_eq!(err.to_string(), "$: expect object");
        }
    }

    #[test]
    fn test_custom_type_error_message() {
        let schema = Schema::object().error("must be a user object");
        assert_eq!(
            schema.parse(&json!(1)).unwrap_err().message,
            "must be a user object"
        );
    }

    #[test]
    fn test_missing_required_field() {
        let err = profile().parse(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "$.name: expect string");
    }

    #[test]
    fn test_optional_and_default_fields() {
        let decoded = profile().parse(&json!({"name": "a"})).unwrap();
        assert_eq!(decoded, object(json!({"name": "a", "theme": "light"})));
    }

    #[test]
    fn test_output_follows_declaration_order() {
        let decoded = profile()
            .parse(&json!({"theme": "dark", "tags": [], "name": "a"}))
            .unwrap();
        let keys: Vec<&str> = decoded.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "tags", "theme"]);
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let decoded = profile().parse(&json!({"name": "a", "extra": 1})).unwrap();
        assert!(!decoded.contains_key("extra"));
    }

    #[test]
    fn test_deny_unknown_keys() {
        let schema = profile().deny_unknown_keys();
        let err = schema.parse(&json!({"name": "a", "extra": 1})).unwrap_err();
        assert_eq!(err.to_string(), "$.extra: unknown key");
    }

    #[test]
    fn test_first_failing_field_aborts() {
        let err = profile()
            .parse(&json!({"name": 1, "tags": [2]}))
            .unwrap_err();
        assert_eq!(err.to_string(), "$.name: expect string");
    }

    #[test]
    fn test_nested_path() {
        let schema = Schema::object().field(
            "a",
            Schema::object().field("b", Schema::array(Schema::number())),
        );
        let err = schema.parse(&json!({"a": {"b": [1, "x"]}})).unwrap_err();
        assert_eq!(err.to_string(), "$.a.b.1: expect number");
    }

    #[test]
    fn test_encode_drops_undeclared_and_undefined() {
        let value = object(json!({"name": "a", "theme": "dark", "stray": true}));
        assert_eq!(
            profile().to_json_value(&value).unwrap(),
            json!({"name": "a", "theme": "dark"})
        );
    }

    #[test]
    fn test_encode_invalid_field_value() {
        let value = object(json!({"name": 3}));
        let err = profile().encode(&value).unwrap_err();
        assert!(matches!(err, EncodeError::Invalid(ref issue) if issue.message == "expect string"));
    }

    #[test]
    fn test_test_checks_fields_and_keys() {
        let schema = profile();
        assert!(schema.test(&object(json!({"name": "a", "theme": "x"}))));
        assert!(!schema.test(&object(json!({"name": 1, "theme": "x"}))));
        assert!(!schema.test(&object(json!({"name": "a", "theme": "x", "other": 0}))));
    }

    #[test]
    fn test_structural_optionality() {
        let schema = profile();
        assert_eq!(schema.required_keys(), vec!["name"]);
        assert_eq!(schema.optional_keys(), vec!["tags", "theme"]);
    }

    #[test]
    fn test_json_schema() {
        let schema = Schema::object()
            .field("id", Schema::number())
            .field("note", Schema::string().optional())
            .deny_unknown_keys();
        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "number"},
                    "note": {"type": "string"}
                },
                "required": ["id"],
                "additionalProperties": false
            })
        );
    }
}
