//! Raw-representable field types
//!
//! A user type (typically a fieldless enum) can declare that it is really a
//! scalar of one [`RawKind`] by implementing [`RawRepresentable`]. When a type
//! lists several kinds, exactly one is used, chosen by [`RawKind::PRECEDENCE`]:
//! int, bool, float, double, string. Encoding and decoding resolve the kind the
//! same way, so a value always reads back through the constructor matching the
//! scalar it was written as.

use crate::value::ColumnValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar kind a raw-representable type converts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawKind {
    /// Native signed integer
    Int,
    /// Boolean (stored as integer 0/1)
    Bool,
    /// Single-precision float (stored widened as real)
    Float,
    /// Double-precision float
    Double,
    /// Text
    String,
}

impl RawKind {
    /// Resolution order when a type declares more than one kind
    pub const PRECEDENCE: [RawKind; 5] = [
        RawKind::Int,
        RawKind::Bool,
        RawKind::Float,
        RawKind::Double,
        RawKind::String,
    ];

    /// Pick the single kind to use from a declared capability list.
    ///
    /// Returns `None` for an empty list.
    pub const fn resolve(capabilities: &[RawKind]) -> Option<RawKind> {
        let mut p = 0;
        while p < Self::PRECEDENCE.len() {
            let candidate = Self::PRECEDENCE[p];
            let mut i = 0;
            while i < capabilities.len() {
                if capabilities[i] as u8 == candidate as u8 {
                    return Some(candidate);
                }
                i += 1;
            }
            p += 1;
        }
        None
    }

    /// Kind name (for error messages)
    pub fn name(&self) -> &'static str {
        match self {
            RawKind::Int => "int",
            RawKind::Bool => "bool",
            RawKind::Float => "float",
            RawKind::Double => "double",
            RawKind::String => "string",
        }
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw scalar produced by or handed to a [`RawRepresentable`] type
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Native signed integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Single-precision float
    Float(f32),
    /// Double-precision float
    Double(f64),
    /// Text
    String(String),
}

impl RawValue {
    /// The kind of this scalar
    pub fn kind(&self) -> RawKind {
        match self {
            RawValue::Int(_) => RawKind::Int,
            RawValue::Bool(_) => RawKind::Bool,
            RawValue::Float(_) => RawKind::Float,
            RawValue::Double(_) => RawKind::Double,
            RawValue::String(_) => RawKind::String,
        }
    }

    /// Lower to the stored column value
    pub fn into_column(self) -> ColumnValue {
        match self {
            RawValue::Int(n) => ColumnValue::Integer(n),
            RawValue::Bool(b) => ColumnValue::from(b),
            RawValue::Float(f) => ColumnValue::from(f),
            RawValue::Double(d) => ColumnValue::Real(d),
            RawValue::String(s) => ColumnValue::Text(s),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(n) => write!(f, "int({n})"),
            RawValue::Bool(b) => write!(f, "bool({b})"),
            RawValue::Float(x) => write!(f, "float({x})"),
            RawValue::Double(x) => write!(f, "double({x})"),
            RawValue::String(s) => write!(f, "string({s:?})"),
        }
    }
}

/// A type stored as a single raw scalar.
///
/// Implement this for an enum and register it as a column type with
/// [`raw_field!`](crate::raw_field):
///
/// ```
/// use rowmap_core::{raw_field, RawKind, RawRepresentable, RawValue};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Level {
///     Low = 1,
///     High = 2,
/// }
///
/// impl RawRepresentable for Level {
///     const RAW_KINDS: &'static [RawKind] = &[RawKind::Int];
///
///     fn to_raw(&self, _kind: RawKind) -> Option<RawValue> {
///         Some(RawValue::Int(*self as i64))
///     }
///
///     fn from_raw(raw: RawValue) -> Option<Self> {
///         match raw {
///             RawValue::Int(1) => Some(Level::Low),
///             RawValue::Int(2) => Some(Level::High),
///             _ => None,
///         }
///     }
/// }
///
/// raw_field!(Level);
/// ```
pub trait RawRepresentable: Sized {
    /// Every scalar kind this type can convert to and from
    const RAW_KINDS: &'static [RawKind];

    /// Produce the scalar for the resolved kind
    fn to_raw(&self, kind: RawKind) -> Option<RawValue>;

    /// Failable construction from a scalar of the resolved kind
    fn from_raw(raw: RawValue) -> Option<Self>;
}

/// The kind `T` is stored as, after precedence resolution
pub fn resolved_kind<T: RawRepresentable>() -> Option<RawKind> {
    RawKind::resolve(T::RAW_KINDS)
}
