//! JSON Schema export.
//!
//! Every schema can describe the wire form it decodes from and encodes to as
//! a JSON Schema (draft 2020-12) fragment. Object `required` lists follow the
//! same structural rule as decoding: a key is required unless its schema
//! accepts undefined.

use serde_json::{json, Value};

/// The `$schema` URI stamped on exported documents.
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Trait for converting schema types to JSON Schema format.
pub trait ToJsonSchema {
    /// Converts this schema to a JSON Schema fragment.
    fn to_json_schema(&self) -> Value;
}

/// Wraps a schema's fragment into a standalone JSON Schema document.
///
/// # Example
///
/// ```rust
/// use wireform::{interop, Schema};
///
/// let doc = interop::document(&Schema::string());
/// assert_eq!(doc["$schema"], interop::DRAFT_2020_12);
/// assert_eq!(doc["type"], "string");
/// ```
pub fn document<S: ToJsonSchema + ?Sized>(schema: &S) -> Value {
    let mut doc = schema.to_json_schema();
    match doc.as_object_mut() {
        Some(obj) => {
            obj.insert("$schema".to_string(), json!(DRAFT_2020_12));
            doc
        }
        None => json!({ "$schema": DRAFT_2020_12, "allOf": [doc] }),
    }
}

/// Merges `extra` keys into a schema fragment.
pub(crate) fn with_keywords(mut fragment: Value, extra: Value) -> Value {
    if let (Some(target), Value::Object(extra)) = (fragment.as_object_mut(), extra) {
        for (key, value) in extra {
            target.insert(key, value);
        }
    }
    fragment
}

/// Describes `fragment` or `null`.
pub(crate) fn or_null(fragment: Value) -> Value {
    json!({ "anyOf": [fragment, { "type": "null" }] })
}
