//! Decode issues and the errors surfaced at the parse boundary.

use std::fmt::{self, Display};

use crate::path::JsonPath;

/// A single structured decode failure.
///
/// An `Issue` is captured by the deepest schema that rejected its input. The
/// path is a snapshot taken when the issue was recorded, so later traversal
/// never rewrites it.
///
/// # Example
///
/// ```rust
/// use wireform::{Issue, JsonPath};
///
/// let issue = Issue::new(JsonPath::root().push_field("name"), "expect string");
/// assert_eq!(issue.to_string(), "$.name: expect string");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Where in the input the failure occurred.
    pub path: JsonPath,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Issue {
    /// Creates a new issue at the given path.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Marker returned by a failed decode.
///
/// It carries no data: the reason lives in the
/// [`DecodeContext`](crate::DecodeContext) as an [`Issue`]. Because it is the
/// error half of a `Result`, it can never be mistaken for a decoded value,
/// not even `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeFailure;

/// The result of decoding a value.
pub type Decoded<T> = Result<T, DecodeFailure>;

/// The error returned by [`SchemaLike::parse`](crate::SchemaLike::parse).
///
/// Displays as `"<path>: <message>"`, e.g. `$.items.2.name: expect string`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// Where in the input the failure occurred.
    pub path: JsonPath,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Returns the wrapped issue.
    pub fn issue(&self) -> Issue {
        Issue::new(self.path.clone(), self.message.clone())
    }
}

impl From<Issue> for ValidationError {
    fn from(issue: Issue) -> Self {
        Self {
            path: issue.path,
            message: issue.message,
        }
    }
}

/// The error returned by [`SchemaLike::parse_json`](crate::SchemaLike::parse_json).
///
/// Malformed JSON text is reported as the parser's own error, never as a
/// [`ValidationError`].
#[derive(Debug, thiserror::Error)]
pub enum ParseJsonError {
    /// The text is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The JSON value does not match the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ParseJsonError {
    /// Returns the validation error, if the text was valid JSON.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ParseJsonError::Validation(err) => Some(err),
            ParseJsonError::Json(_) => None,
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
    assert_send::<ParseJsonError>();
    assert_sync::<ParseJsonError>();
};
