//! Error types for decoding and encoding.
//!
//! Decoding reports data-shape problems as an [`Issue`] recorded in the
//! decode context and surfaced as a [`ValidationError`]. Encoding reports
//! schema contract violations as an [`EncodeError`].

mod encode;
mod issue;

pub use encode::EncodeError;
pub use issue::{DecodeFailure, Decoded, Issue, ParseJsonError, ValidationError};
