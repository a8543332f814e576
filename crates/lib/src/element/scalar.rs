//! Scalar values for configuration elements.
//!
//! This module provides the Scalar enum representing the terminal values
//! that can appear in a configuration tree: null, booleans, integers,
//! floating-point numbers, and text.

use std::fmt;

/// A terminal configuration value.
///
/// `Scalar` is the leaf variant of [`ConfigElement`](super::ConfigElement).
/// Integer values are normalized to `i64` and floating-point values to
/// `f64`; codecs collapse narrower widths onto these on decode.
///
/// # Direct Comparisons
///
/// `Scalar` implements `PartialEq` with primitive types for ergonomic
/// comparisons:
///
/// ```
/// # use graft::element::Scalar;
/// let text = Scalar::Text("hello".to_string());
/// let number = Scalar::Int(42);
///
/// assert!(text == "hello");
/// assert!(number == 42);
/// assert!(!(number == "hello"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Null/absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer value
    Int(i64),
    /// 64-bit floating-point value
    Float(f64),
    /// UTF-8 text value
    Text(String),
}

impl Scalar {
    /// Returns true if this is the null scalar
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Returns true if this scalar is numeric (integer or float)
    pub fn is_number(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }

    /// Returns the scalar kind as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float.
    ///
    /// Integers widen losslessly enough for configuration purposes; an
    /// explicit `Float` is returned as-is.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a string slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl PartialEq<str> for Scalar {
    fn eq(&self, other: &str) -> bool {
        match self {
            Scalar::Text(s) => s == other,
            _ => false,
        }
    }
}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Scalar {
    fn eq(&self, other: &i64) -> bool {
        match self {
            Scalar::Int(n) => n == other,
            _ => false,
        }
    }
}

impl PartialEq<bool> for Scalar {
    fn eq(&self, other: &bool) -> bool {
        match self {
            Scalar::Bool(b) => b == other,
            _ => false,
        }
    }
}

impl PartialEq<f64> for Scalar {
    fn eq(&self, other: &f64) -> bool {
        match self {
            Scalar::Float(x) => x == other,
            _ => false,
        }
    }
}
