//! Named schema storage.
//!
//! This module provides the [`SchemaRegistry`] type, a thread-safe map from
//! names to type-erased schemas. It suits a settings layer keyed by name:
//! every stored entry is decoded and encoded through the schema registered
//! under its key.

use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::{DecodeContext, ParseOptions};
use crate::error::{EncodeError, ValidationError};
use crate::interop::{self, DRAFT_2020_12};
use crate::schema::{SchemaLike, ValueSchema};

/// Type alias for the schema storage map.
type SchemaMap = Arc<RwLock<HashMap<String, Arc<dyn ValueSchema>>>>;

/// A thread-safe registry of named schemas.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can parse concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share the same underlying map.
///
/// # Example
///
/// ```rust
/// use wireform::{Schema, SchemaLike, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry.register("volume", Schema::number().range(0.0..=1.0).catch(0.5)).unwrap();
/// registry.register("theme", Schema::string().with_default("light".into())).unwrap();
///
/// assert_eq!(registry.parse("volume", Some(&json!(3))).unwrap(), Some(json!(0.5)));
/// assert_eq!(registry.parse("theme", None).unwrap(), Some(json!("light")));
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
    options: ParseOptions,
}

impl SchemaRegistry {
    /// Creates a new empty registry with default parse options.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
            options: ParseOptions::default(),
        }
    }

    /// Sets the maximum nesting depth used by every parse through this
    /// registry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wireform::SchemaRegistry;
    ///
    /// let registry = SchemaRegistry::new().with_max_depth(16);
    /// assert_eq!(registry.options().max_depth(), 16);
    /// ```
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.options = self.options.with_max_depth(depth);
        self
    }

    /// Returns the parse options used by this registry.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Registers a schema with the given name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    pub fn register<S>(&self, name: impl Into<String>, schema: S) -> Result<(), RegistryError>
    where
        S: SchemaLike + 'static,
    {
        self.register_shared(name, Arc::new(schema))
    }

    /// Registers an already-erased schema with the given name.
    pub fn register_shared(
        &self,
        name: impl Into<String>,
        schema: Arc<dyn ValueSchema>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut schemas = self.schemas.write();

        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(name = %name, "registered schema");
        schemas.insert(name, schema);
        Ok(())
    }

    /// Retrieves a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ValueSchema>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns true if no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn ValueSchema>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))
    }

    /// Decodes a possibly-undefined value with the named schema.
    ///
    /// Returns the normalised wire form; `None` means the schema decoded the
    /// value to undefined.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` for an unknown name and
    /// `RegistryError::Validation` if the value does not match.
    pub fn parse(&self, name: &str, input: Option<&Value>) -> Result<Option<Value>, RegistryError> {
        let schema = self.lookup(name)?;
        let mut ctx = DecodeContext::with_options(&self.options);
        match schema.decode_value(input, &mut ctx) {
            Ok(value) => Ok(value),
            Err(_) => Err(ctx.into_error().into()),
        }
    }

    /// Parses `text` as JSON, then decodes it with the named schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wireform::{RegistryError, Schema, SchemaRegistry};
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("size", Schema::tuple((Schema::number(), Schema::number()))).unwrap();
    ///
    /// assert_eq!(registry.parse_json("size", "[640, 480]").unwrap(), Some(json!([640, 480])));
    /// assert!(matches!(registry.parse_json("size", "[640,"), Err(RegistryError::Json(_))));
    /// assert!(matches!(registry.parse_json("size", "[640]"), Err(RegistryError::Validation(_))));
    /// ```
    pub fn parse_json(&self, name: &str, text: &str) -> Result<Option<Value>, RegistryError> {
        let schema = self.lookup(name)?;
        let input: Value = serde_json::from_str(text)?;
        let mut ctx = DecodeContext::with_options(&self.options);
        match schema.decode_value(Some(&input), &mut ctx) {
            Ok(value) => Ok(value),
            Err(_) => Err(ctx.into_error().into()),
        }
    }

    /// Encodes a wire-form value with the named schema and serialises it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Encode` if the value cannot be encoded, or if
    /// it encodes to undefined.
    pub fn stringify_json(&self, name: &str, value: &Value) -> Result<String, RegistryError> {
        let schema = self.lookup(name)?;
        let encoded = schema
            .encode_value(Some(value))?
            .ok_or(EncodeError::UndefinedRoot)?;
        Ok(serde_json::to_string(&encoded)?)
    }

    /// Exports all registered schemas as a JSON Schema document with `$defs`.
    pub fn to_json_schema(&self) -> Value {
        let schemas = self.schemas.read();
        let mut names: Vec<&String> = schemas.keys().collect();
        names.sort();

        let mut defs = Map::new();
        for name in names {
            defs.insert(name.clone(), schemas[name].to_json_schema());
        }

        json!({
            "$schema": DRAFT_2020_12,
            "$defs": defs
        })
    }

    /// Exports a single schema as a standalone JSON Schema document.
    ///
    /// Returns `None` if the schema doesn't exist.
    pub fn export_schema(&self, name: &str) -> Option<Value> {
        let schema = self.get(name)?;
        Some(interop::document(&*schema))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
            options: self.options.clone(),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a schema with a name that already exists.
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to use a schema name that doesn't exist.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),

    /// The value does not match the named schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The text is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The value could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
