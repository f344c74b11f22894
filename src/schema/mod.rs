//! Schema definitions.
//!
//! Every schema implements [`SchemaLike`]: it can `test` a typed value,
//! `decode` an untyped JSON value into one, and `encode` it back. Schemas are
//! built with the [`Schema`] factory and composed with the combinator methods
//! on [`SchemaLike`].
//!
//! # Example
//!
//! ```rust
//! use wireform::{Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! assert!(schema.parse(&json!("hello")).is_ok());
//! assert!(schema.parse(&json!("")).is_err());
//! ```

mod array;
mod combinators;
mod fallback;
mod numeric;
mod object;
mod optional;
mod primitive;
mod string;
mod traits;
mod transform;
mod tuple;

pub use array::ArraySchema;
pub use combinators::{IntersectionSchema, UnionSchema};
pub use fallback::{Catch, WithDefault};
pub use numeric::{BigIntSchema, NumberSchema};
pub use object::ObjectSchema;
pub use optional::{AutoNullOptional, Nullable, Optional};
pub use primitive::{BooleanSchema, EnumSchema, LiteralSchema, NativeEnum, NullSchema};
pub use string::StringSchema;
pub use traits::{BoxedSchema, Erased, SchemaLike, ValueSchema};
pub use transform::{Transform, TryTransform};
pub use tuple::TupleSchema;

use serde_json::Value;

/// Entry point for creating schemas.
///
/// `Schema` provides factory methods for every schema type. Unary wrappers
/// (`optional`, `nullable`, `catch`, `transform`, ...) are methods on
/// [`SchemaLike`] instead.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let settings = Schema::object()
///     .field("volume", Schema::number().range(0.0..=1.0).catch(0.5))
///     .field("muted", Schema::boolean().with_default(false))
///     .field("recent", Schema::array(Schema::string()).max_len(10).optional());
///
/// let value = settings.parse(&json!({"volume": 7})).unwrap();
/// assert_eq!(
///     settings.to_json_value(&value).unwrap(),
///     json!({"volume": 0.5, "muted": false})
/// );
/// ```
pub struct Schema;

impl Schema {
    /// Creates a schema accepting only `null`.
    pub fn null() -> NullSchema {
        NullSchema
    }

    /// Creates a schema accepting booleans.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema
    }

    /// Creates a schema accepting any JSON number as `f64`.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a schema accepting JSON integers as `i128`.
    pub fn bigint() -> BigIntSchema {
        BigIntSchema::new()
    }

    /// Creates a schema accepting strings.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a schema accepting exactly `value`.
    pub fn literal<T>(value: T) -> LiteralSchema<T>
    where
        T: Clone + PartialEq + Into<Value> + Send + Sync,
    {
        LiteralSchema::new(value)
    }

    /// Creates a schema accepting the members of a native enum.
    pub fn native_enum<E: NativeEnum>() -> EnumSchema<E> {
        EnumSchema::new()
    }

    /// Creates a schema for arrays whose items match `items`.
    pub fn array<S: SchemaLike>(items: S) -> ArraySchema<S> {
        ArraySchema::new(items)
    }

    /// Creates a schema for fixed-length arrays from a tuple of schemas.
    ///
    /// Tuples of 1 to 8 schemas are supported.
    pub fn tuple<T>(members: T) -> TupleSchema<T> {
        TupleSchema::new(members)
    }

    /// Creates an object schema with no fields.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates a union trying `alternatives` in order.
    pub fn union<T>(alternatives: Vec<BoxedSchema<T>>) -> UnionSchema<T> {
        UnionSchema::new(alternatives)
    }

    /// Creates an intersection of two object-shaped schemas.
    pub fn intersection<A, B>(first: A, second: B) -> IntersectionSchema
    where
        A: SchemaLike + 'static,
        B: SchemaLike + 'static,
    {
        IntersectionSchema::new(first, second)
    }
}
