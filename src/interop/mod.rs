//! Interoperability with other schema formats.
//!
//! This module exports wireform schemas as JSON Schema documents.

pub mod json_schema;

pub use json_schema::{document, ToJsonSchema, DRAFT_2020_12};
