//! # Wireform
//!
//! Composable runtime schemas that check, decode and encode JSON values.
//!
//! ## Overview
//!
//! A schema describes one typed value and its JSON form. It can:
//!
//! - `test` whether a typed value is valid,
//! - `decode` an untyped [`serde_json::Value`] into the typed value, recording
//!   where decoding failed,
//! - `encode` the typed value back into JSON.
//!
//! Decode and encode are inverses: whenever `test(v)` holds,
//! `decode(encode(v))` yields `v` again. That makes schemas a good fit for
//! persisted data such as settings, where values must survive a round trip
//! through storage and malformed entries should fail with a precise location
//! or heal themselves with `catch`.
//!
//! ## Core Types
//!
//! - [`Schema`]: entry point for creating schemas
//! - [`SchemaLike`]: the test/decode/encode contract plus combinator methods
//! - [`DecodeContext`]: per-call traversal state (key path and last issue)
//! - [`ValidationError`]: the error returned by `parse`, displayed as
//!   `<path>: <message>`
//! - [`EncodeError`]: structural faults found while encoding
//! - [`SchemaRegistry`]: named, type-erased schemas for a settings layer
//!
//! ## Example
//!
//! ```rust
//! use wireform::{Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("items", Schema::array(Schema::object().field("name", Schema::string())));
//!
//! let err = schema
//!     .parse(&json!({"items": [{"name": "a"}, {"name": "b"}, {"name": 3}]}))
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "$.items.2.name: expect string");
//!
//! let value = schema.parse_json(r#"{"items": [{"name": "a", "extra": 1}]}"#).unwrap();
//! assert_eq!(schema.stringify_json(&value).unwrap(), r#"{"items":[{"name":"a"}]}"#);
//! ```

pub mod context;
pub mod error;
pub mod interop;
pub mod path;
pub mod registry;
pub mod schema;

pub use context::{DecodeContext, KeyScope, ParseOptions, DEFAULT_MAX_DEPTH};
pub use error::{
    DecodeFailure, Decoded, EncodeError, Issue, ParseJsonError, ValidationError,
};
pub use interop::ToJsonSchema;
pub use path::{JsonPath, PathSegment};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{
    ArraySchema, AutoNullOptional, BigIntSchema, BooleanSchema, BoxedSchema, Catch, EnumSchema,
    Erased, IntersectionSchema, LiteralSchema, NativeEnum, NullSchema, Nullable, NumberSchema,
    ObjectSchema, Optional, Schema, SchemaLike, StringSchema, Transform, TryTransform,
    TupleSchema, UnionSchema, ValueSchema, WithDefault,
};
