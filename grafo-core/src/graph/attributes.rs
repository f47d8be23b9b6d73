//! Typed attribute bags attached to vertices and edges.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Attribute key reserved for edge weights. Attribute maps never contain it.
pub const WEIGHT_KEY: &str = "weight";

/// Heterogeneous attribute value.
///
/// The untagged representation keeps JSON payloads natural: `true`, `3`,
/// `2.5` and `"red"` map to the four variants in that order.
///
/// # Examples
/// ```
/// use grafo_core::AttributeValue;
///
/// assert_eq!(AttributeValue::from(3).as_f64(), Some(3.0));
/// assert_eq!(AttributeValue::from("red").as_f64(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer number.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Free text.
    Str(String),
}

impl AttributeValue {
    /// Returns the numeric value for [`Self::Int`] and [`Self::Float`].
    #[expect(
        clippy::cast_precision_loss,
        reason = "attribute integers are user-supplied magnitudes, not identifiers"
    )]
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }

    /// Returns the boolean value for [`Self::Bool`].
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text for [`Self::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Parses a value typed on a command line: booleans, integers and floats
    /// are recognised, anything else stays text.
    ///
    /// # Examples
    /// ```
    /// use grafo_core::AttributeValue;
    ///
    /// assert_eq!(AttributeValue::parse("true"), AttributeValue::Bool(true));
    /// assert_eq!(AttributeValue::parse("12"), AttributeValue::Int(12));
    /// assert_eq!(AttributeValue::parse("0.5"), AttributeValue::Float(0.5));
    /// assert_eq!(AttributeValue::parse("dsatur"), AttributeValue::from("dsatur"));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Ok(flag) = raw.parse::<bool>() {
            return Self::Bool(flag);
        }
        if let Ok(int) = raw.parse::<i64>() {
            return Self::Int(int);
        }
        if let Ok(float) = raw.parse::<f64>() {
            return Self::Float(float);
        }
        Self::Str(raw.to_owned())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Attribute bag keyed by name, iterated in key order.
pub type Attributes = BTreeMap<String, AttributeValue>;
