//! Column value types for rowmap
//!
//! This module defines [`ColumnValue`], the closed set of scalar kinds a
//! row-store cell may hold.
//!
//! ## Storage Contract
//!
//! - Five variants only: null, integer, real, text, blob
//! - Booleans are stored as `Integer(0)` / `Integer(1)`
//! - Single-precision floats are widened to `Real`
//! - Text and Blob are distinct types, never coerced into each other

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value as the row store sees it.
///
/// ## Equality Rules
///
/// - Different variants are NEVER equal (no affinity coercion)
/// - `Integer(1)` != `Real(1.0)`
/// - `Text("abc")` != `Blob([97, 98, 99])`
/// - Real uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColumnValue {
    /// SQL NULL
    Null,

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit IEEE-754 floating point
    Real(f64),

    /// UTF-8 encoded text
    Text(String),

    /// Arbitrary binary data
    Blob(Vec<u8>),
}

impl ColumnValue {
    /// Returns the storage class name (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Null => "null",
            ColumnValue::Integer(_) => "integer",
            ColumnValue::Real(_) => "real",
            ColumnValue::Text(_) => "text",
            ColumnValue::Blob(_) => "blob",
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// Try to get as i64
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ColumnValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_real(&self) -> Option<f64> {
        match self {
            ColumnValue::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as bytes slice
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            ColumnValue::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl PartialEq for ColumnValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ColumnValue::Null, ColumnValue::Null) => true,
            (ColumnValue::Integer(a), ColumnValue::Integer(b)) => a == b,
            (ColumnValue::Real(a), ColumnValue::Real(b)) => a == b,
            (ColumnValue::Text(a), ColumnValue::Text(b)) => a == b,
            (ColumnValue::Blob(a), ColumnValue::Blob(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => write!(f, "null"),
            ColumnValue::Integer(n) => write!(f, "integer({n})"),
            ColumnValue::Real(r) => write!(f, "real({r})"),
            ColumnValue::Text(s) => write!(f, "text({s:?})"),
            ColumnValue::Blob(b) => write!(f, "blob({} bytes)", b.len()),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        ColumnValue::Integer(v)
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Integer(i64::from(v))
    }
}

impl From<f32> for ColumnValue {
    fn from(v: f32) -> Self {
        ColumnValue::Real(f64::from(v))
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        ColumnValue::Real(v)
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        ColumnValue::Text(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::Text(v.to_owned())
    }
}

impl From<Vec<u8>> for ColumnValue {
    fn from(v: Vec<u8>) -> Self {
        ColumnValue::Blob(v)
    }
}

impl From<&[u8]> for ColumnValue {
    fn from(v: &[u8]) -> Self {
        ColumnValue::Blob(v.to_vec())
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => ColumnValue::Null,
        }
    }
}
