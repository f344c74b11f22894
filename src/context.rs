//! Per-call decode state.
//!
//! A [`DecodeContext`] is created by every `parse` call and threaded by
//! mutable reference through the whole schema tree. It tracks the key path of
//! the value currently being decoded and the last recorded [`Issue`].
//!
//! Compound schemas enter a child key with [`DecodeContext::enter`], which
//! returns a [`KeyScope`] guard. The guard pops the key when it is dropped, so
//! the path is restored on every exit path, including early returns through
//! `?`.

use std::ops::{Deref, DerefMut};

use crate::error::{DecodeFailure, Issue, ValidationError};
use crate::path::{JsonPath, PathSegment};

/// Default nesting limit, matching serde_json's own recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options that control a single decode pass.
///
/// # Example
///
/// ```rust
/// use wireform::{ParseOptions, Schema, SchemaLike};
/// use serde_json::json;
///
/// let options = ParseOptions::new().with_max_depth(1);
/// let schema = Schema::array(Schema::array(Schema::number()));
///
/// let err = schema.parse_with(Some(&json!([[1]])), &options).unwrap_err();
/// assert_eq!(err.to_string(), "$.0.0: exceeds maximum depth of 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    max_depth: usize,
}

impl ParseOptions {
    /// Creates options with the default depth limit.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum number of nested keys a decode may enter.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the maximum nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable traversal state for one decode pass.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    path: JsonPath,
    issue: Option<Issue>,
    max_depth: usize,
}

impl DecodeContext {
    /// Creates a context positioned at the root with default options.
    pub fn new() -> Self {
        Self::with_options(&ParseOptions::default())
    }

    /// Creates a context positioned at the root.
    pub fn with_options(options: &ParseOptions) -> Self {
        Self {
            path: JsonPath::root(),
            issue: None,
            max_depth: options.max_depth(),
        }
    }

    /// Creates a fresh context for speculative decoding.
    ///
    /// The scratch context starts at the same path with the same limits but
    /// no issue, and nothing recorded in it reaches `self`.
    pub fn scratch(&self) -> Self {
        Self {
            path: self.path.clone(),
            issue: None,
            max_depth: self.max_depth,
        }
    }

    /// Returns the path of the value currently being decoded.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Returns the last recorded issue.
    pub fn issue(&self) -> Option<&Issue> {
        self.issue.as_ref()
    }

    /// Records an issue at the current path, replacing any earlier one.
    pub fn set_issue(&mut self, message: impl Into<String>) {
        self.issue = Some(Issue::new(self.path.clone(), message));
    }

    /// Records an issue at the current path and returns the failure marker.
    ///
    /// ```rust
    /// use wireform::DecodeContext;
    ///
    /// let mut ctx = DecodeContext::new();
    /// let failure = ctx.fail("expect string");
    /// assert_eq!(ctx.issue().unwrap().to_string(), "$: expect string");
    /// # let _ = failure;
    /// ```
    pub fn fail(&mut self, message: impl Into<String>) -> DecodeFailure {
        self.set_issue(message);
        DecodeFailure
    }

    /// Enters a child key for the lifetime of the returned scope.
    ///
    /// Fails if the new path would exceed the configured maximum depth.
    pub fn enter(
        &mut self,
        segment: impl Into<PathSegment>,
    ) -> Result<KeyScope<'_>, DecodeFailure> {
        self.path.push(segment.into());
        let mut scope = KeyScope { ctx: self };
        if scope.path.len() > scope.max_depth {
            let message = format!("exceeds maximum depth of {}", scope.max_depth);
            return Err(scope.fail(message));
        }
        Ok(scope)
    }

    /// Takes the recorded issue out of the context.
    pub fn take_issue(&mut self) -> Option<Issue> {
        self.issue.take()
    }

    /// Consumes the context, returning its issue.
    ///
    /// A failed decode always records an issue; should one be missing anyway,
    /// a generic issue at the current path stands in for it.
    pub fn into_issue(self) -> Issue {
        match self.issue {
            Some(issue) => issue,
            None => Issue::new(self.path, "decode failed"),
        }
    }

    /// Consumes the context, converting its issue into a [`ValidationError`].
    pub fn into_error(self) -> ValidationError {
        self.into_issue().into()
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A child key entered on a [`DecodeContext`].
///
/// Dereferences to the context; the key is popped when the scope drops.
#[derive(Debug)]
pub struct KeyScope<'a> {
    ctx: &'a mut DecodeContext,
}

impl Deref for KeyScope<'_> {
    type Target = DecodeContext;

    fn deref(&self) -> &DecodeContext {
        self.ctx
    }
}

impl DerefMut for KeyScope<'_> {
    fn deref_mut(&mut self) -> &mut DecodeContext {
        self.ctx
    }
}

impl Drop for KeyScope<'_> {
    fn drop(&mut self) {
        self.ctx.path.pop();
    }
}
