use alloc::string::{String, ToString};
use core::fmt;

use serde_json::Value;

// -----------------------------------------------------------------------------
// ValueKind

/// The JSON kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Returns the kind of `value`.
    #[inline]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns a lowercase name, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// ExpectedKind

/// What a codec accepts, used to describe type mismatches.
///
/// Integer kinds follow the width of the bound field:
/// `i8`-`i32` expect [`Int`](Self::Int), `i64`/`isize` expect [`Int64`](Self::Int64),
/// and likewise for the unsigned kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectedKind {
    Bool,
    Int,
    Uint,
    Int64,
    Uint64,
    Double,
    String,
    /// Any JSON value.
    Raw,
    Object,
    Array,
    /// A codec-specific description, e.g. from a serde-backed codec.
    Custom(&'static str),
}

impl ExpectedKind {
    /// Returns a lowercase name, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Double => "double",
            Self::String => "string",
            Self::Raw => "any value",
            Self::Object => "object",
            Self::Array => "array",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ExpectedKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// preview

/// Maximum number of characters kept by [`preview`].
pub const PREVIEW_LIMIT: usize = 32;

/// Renders `value` as compact JSON, truncated to [`PREVIEW_LIMIT`] characters.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vc_bind::value::preview;
///
/// assert_eq!(preview(&json!("str")), "\"str\"");
/// assert_eq!(preview(&json!("x".repeat(40))).chars().count(), 35);
/// ```
pub fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_LIMIT {
        return text;
    }
    let mut out: String = text.chars().take(PREVIEW_LIMIT).collect();
    out.push_str("...");
    out
}
