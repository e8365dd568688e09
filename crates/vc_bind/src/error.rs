use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::value::{ExpectedKind, ValueKind, preview};

// -----------------------------------------------------------------------------
// ErrorKind

/// The closed set of failures surfaced by binding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The source text is not valid JSON. Carries the parser's message.
    #[error("malformed JSON: {0}")]
    Parse(String),

    /// The source value's kind does not match what the codec expects.
    #[error("type mismatch: expected {expected}, found {found} `{preview}`")]
    TypeMismatch {
        expected: ExpectedKind,
        found: ValueKind,
        preview: String,
    },

    /// A member without a registered field, rejected by `ERROR_ON_UNKNOWN`.
    #[error("unknown member `{0}` rejected")]
    UnknownMember(String),

    /// Required fields that ended up `Missing` after deserialization.
    #[error("missing required fields: {}", .0.join(", "))]
    PresenceViolation(Vec<&'static str>),

    /// Broken invariant: a registration bug or a detached allocator.
    #[error("internal error: {0}")]
    Inner(Cow<'static, str>),

    /// The sink's writer failed.
    #[error("i/o failure: {0}")]
    Io(String),
}

// -----------------------------------------------------------------------------
// PathSegment

/// One step of the location attached to a [`BindError`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A registered field, by wire name. Displayed as `.name`.
    Field(&'static str),
    /// A map entry. Displayed as `["key"]`.
    Key(String),
    /// A sequence element. Displayed as `[3]`.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, ".{name}"),
            Self::Key(key) => write!(f, "[{key:?}]"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

// -----------------------------------------------------------------------------
// BindError

/// An [`ErrorKind`] plus the path at which it happened.
///
/// Codecs return errors without location; every container layer the error
/// bubbles through appends its own segment, so the final path reads from
/// the outermost struct down to the failing leaf.
///
/// # Examples
///
/// ```
/// use vc_bind::{BindError, ErrorKind};
///
/// let err = BindError::unknown_member("extra")
///     .with_field("inner")
///     .with_index(2)
///     .with_field("items");
///
/// assert_eq!(err.path_string(), ".items[2].inner");
/// assert!(matches!(err.kind(), ErrorKind::UnknownMember(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    kind: ErrorKind,
    // Innermost segment first.
    path: Vec<PathSegment>,
}

/// Result alias used by every binding operation.
pub type BindResult<T> = Result<T, BindError>;

impl BindError {
    /// Creates an error without location.
    #[cold]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    /// Builds a [`ErrorKind::TypeMismatch`] describing `found`.
    #[cold]
    pub fn mismatch(expected: ExpectedKind, found: &Value) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected,
            found: ValueKind::of(found),
            preview: preview(found),
        })
    }

    #[cold]
    pub fn unknown_member(name: &str) -> Self {
        Self::new(ErrorKind::UnknownMember(name.to_string()))
    }

    #[cold]
    pub fn presence(missing: Vec<&'static str>) -> Self {
        Self::new(ErrorKind::PresenceViolation(missing))
    }

    #[cold]
    pub fn inner(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Inner(msg.into()))
    }

    #[cold]
    pub fn parse(err: &serde_json::Error) -> Self {
        Self::new(ErrorKind::Parse(err.to_string()))
    }

    #[cold]
    pub fn io(err: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Io(err.to_string()))
    }

    /// Returns the failure kind.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consumes the error, returning the failure kind.
    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Iterates the path from the outermost segment to the innermost.
    pub fn path(&self) -> impl DoubleEndedIterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    /// Renders the path, e.g. `.items[2]["key"].name`.
    pub fn path_string(&self) -> String {
        use core::fmt::Write;

        let mut out = String::new();
        for segment in self.path() {
            let _ = write!(out, "{segment}");
        }
        out
    }

    /// Prefixes the path with a field segment.
    #[inline]
    pub fn with_field(mut self, name: &'static str) -> Self {
        self.path.push(PathSegment::Field(name));
        self
    }

    /// Prefixes the path with a sequence index.
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }

    /// Prefixes the path with a map key.
    #[inline]
    pub fn with_key(mut self, key: &str) -> Self {
        self.path.push(PathSegment::Key(key.to_string()));
        self
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            fmt::Display::fmt(&self.kind, f)
        } else {
            write!(f, "{} at `{}`", self.kind, self.path_string())
        }
    }
}

impl core::error::Error for BindError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for BindError {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
