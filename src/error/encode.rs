//! Structural faults raised while encoding.

use crate::error::Issue;

/// A contract violation found while encoding a typed value.
///
/// Encoding assumes its input already satisfies the schema, so these errors
/// point at schema construction mistakes rather than bad data. They carry no
/// key path.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Two intersection members produced the same key.
    #[error("duplicate key \"{0}\" in intersection")]
    DuplicateKey(String),

    /// An intersection member did not encode to an object.
    #[error("intersection member did not encode to an object")]
    NonObjectMember,

    /// No union alternative accepted the value.
    #[error("no union alternative matches the value")]
    NoMatchingAlternative,

    /// NaN and infinities have no JSON representation.
    #[error("number {0} has no JSON representation")]
    NonFiniteNumber(f64),

    /// The integer does not fit in a JSON number.
    #[error("bigint {0} is out of range for a JSON number")]
    BigIntOutOfRange(i128),

    /// An erased schema was handed a value it rejects.
    #[error("value rejected by schema: {0}")]
    Invalid(Issue),

    /// A fallible transform refused to encode the value.
    #[error("transform failed: {0}")]
    Transform(String),

    /// The value encodes to undefined, which has no JSON text.
    #[error("value encodes to undefined")]
    UndefinedRoot,

    /// Serialising the encoded value failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<EncodeError>();
    assert_sync::<EncodeError>();
};
