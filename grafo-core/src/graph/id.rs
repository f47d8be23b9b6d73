//! Vertex identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, hashable vertex identifier.
///
/// Identifiers are either integers or strings. The total order places every
/// integer before every string, which gives algorithms a deterministic
/// tie-break independent of insertion order.
///
/// # Examples
/// ```
/// use grafo_core::VertexId;
///
/// let a = VertexId::from(7);
/// let b = VertexId::from("seven");
/// assert!(a < b);
/// assert_eq!(a.to_string(), "7");
/// assert_eq!(b.to_string(), "seven");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VertexId {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    Str(String),
}

impl VertexId {
    /// Returns the integer value when the identifier is numeric.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    /// Returns the string value when the identifier is textual.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(value) => Some(value),
        }
    }

    /// Parses an identifier typed by a user: integers become [`VertexId::Int`],
    /// anything else [`VertexId::Str`].
    ///
    /// # Examples
    /// ```
    /// use grafo_core::VertexId;
    ///
    /// assert_eq!(VertexId::parse("42"), VertexId::Int(42));
    /// assert_eq!(VertexId::parse("a"), VertexId::from("a"));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse::<i64>()
            .map_or_else(|_| Self::Str(raw.to_owned()), Self::Int)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for VertexId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for VertexId {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for VertexId {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for VertexId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for VertexId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&VertexId> for VertexId {
    fn from(value: &VertexId) -> Self {
        value.clone()
    }
}
