//! Field kinds and per-type conversions
//!
//! Every Rust type usable as a record field implements [`FieldType`]. The
//! implementation declares a [`FieldKind`] once, as an associated constant, so
//! encoders and decoders branch on a closed set of variants instead of probing
//! values at runtime.
//!
//! ## Supported Types
//!
//! | Rust type | Kind | Column |
//! |-----------|------|--------|
//! | `i64` | NativeInt | integer |
//! | `bool` | Bool | integer 0/1 |
//! | `f32` | Float | real (widened) |
//! | `f64` | Double | real |
//! | `String`, `Uuid` | Text | text |
//! | `Vec<u8>` | Blob | blob |
//! | `DateTime<Utc>`, `NaiveDateTime`, `NaiveDate` | Temporal | text |
//! | [`raw_field!`](crate::raw_field) types | Raw | per [`RawKind`] |
//! | [`Json<T>`], [`json_field!`](crate::json_field) types | Structured | JSON text |
//! | `Option<T>` | as `T`, nullable | as `T` or NULL |
//!
//! Explicitly-sized integers other than `i64` (`i8`..`i32`, all unsigned
//! widths, `isize`) are deliberately unsupported and fail with
//! [`MappingError::UnsupportedType`](crate::MappingError::UnsupportedType) in
//! both directions. Widen them to `i64` at the record boundary.

use crate::context::CodingContext;
use crate::error::FieldError;
use crate::raw::{RawKind, RawRepresentable, RawValue};
use crate::temporal::{TemporalKind, TemporalValue};
use crate::value::ColumnValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use uuid::Uuid;

/// How a field is stored, resolved once per declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Native signed integer (`i64`)
    NativeInt,
    /// Boolean
    Bool,
    /// Single-precision float
    Float,
    /// Double-precision float
    Double,
    /// Text
    Text,
    /// Binary blob
    Blob,
    /// Temporal value with a text storage transform
    Temporal(TemporalKind),
    /// Raw-representable type stored as one scalar
    Raw(RawKind),
    /// Anything else, stored as JSON text
    Structured,
    /// Integer width the bridge does not support
    Unsupported {
        /// Declared Rust type
        type_name: &'static str,
        /// Width in bits
        width: u32,
    },
}

impl FieldKind {
    /// Kind for a raw-representable type declaring `capabilities`
    ///
    /// Panics at compile time when used in a constant with an empty list.
    pub const fn raw_of(capabilities: &[RawKind]) -> FieldKind {
        match RawKind::resolve(capabilities) {
            Some(kind) => FieldKind::Raw(kind),
            None => panic!("RawRepresentable type must declare at least one RawKind"),
        }
    }
}

/// A field value in transit, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent / NULL
    Null,
    /// Native signed integer
    NativeInt(i64),
    /// Boolean
    Bool(bool),
    /// Single-precision float
    Float(f32),
    /// Double-precision float
    Double(f64),
    /// Text
    Text(String),
    /// Binary blob
    Blob(Vec<u8>),
    /// Temporal value
    Temporal(TemporalValue),
    /// Raw scalar of a raw-representable type
    Raw(RawValue),
    /// JSON text of a structured value
    Structured(String),
}

impl FieldValue {
    /// Lower to the stored column value
    pub fn into_column(self) -> ColumnValue {
        match self {
            FieldValue::Null => ColumnValue::Null,
            FieldValue::NativeInt(n) => ColumnValue::Integer(n),
            FieldValue::Bool(b) => ColumnValue::from(b),
            FieldValue::Float(f) => ColumnValue::from(f),
            FieldValue::Double(d) => ColumnValue::Real(d),
            FieldValue::Text(s) => ColumnValue::Text(s),
            FieldValue::Blob(b) => ColumnValue::Blob(b),
            FieldValue::Temporal(t) => ColumnValue::Text(t.to_storage()),
            FieldValue::Raw(raw) => raw.into_column(),
            FieldValue::Structured(json) => ColumnValue::Text(json),
        }
    }

    /// Short description (for error messages)
    pub fn describe(&self) -> String {
        match self {
            FieldValue::Null => "null".to_owned(),
            FieldValue::NativeInt(n) => format!("integer({n})"),
            FieldValue::Bool(b) => format!("bool({b})"),
            FieldValue::Float(f) => format!("float({f})"),
            FieldValue::Double(d) => format!("double({d})"),
            FieldValue::Text(s) => format!("text({s:?})"),
            FieldValue::Blob(b) => format!("blob({} bytes)", b.len()),
            FieldValue::Temporal(t) => format!("temporal({})", t.to_storage()),
            FieldValue::Raw(raw) => raw.to_string(),
            FieldValue::Structured(json) => format!("json({json})"),
        }
    }

    fn mismatch(self) -> FieldError {
        FieldError::TypeMismatch(self.describe())
    }
}

/// A Rust type that can be stored in one column
pub trait FieldType: Sized {
    /// Storage kind of this type
    const KIND: FieldKind;

    /// Whether NULL / a missing column decodes to a value
    const NULLABLE: bool = false;

    /// Convert to a tagged field value
    fn to_field(&self, context: &CodingContext) -> Result<FieldValue, FieldError>;

    /// Rebuild from a tagged field value read according to [`Self::KIND`]
    fn from_field(value: FieldValue, context: &CodingContext) -> Result<Self, FieldError>;

    /// Value used when the column is missing or NULL; only nullable types have one
    fn absent() -> Option<Self> {
        None
    }
}

// ============================================================================
// Primitive impls
// ============================================================================

impl FieldType for i64 {
    const KIND: FieldKind = FieldKind::NativeInt;

    fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
        Ok(FieldValue::NativeInt(*self))
    }

    fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
        match value {
            FieldValue::NativeInt(n) => Ok(n),
            other => Err(other.mismatch()),
        }
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
        Ok(FieldValue::Bool(*self))
    }

    fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            other => Err(other.mismatch()),
        }
    }
}

impl FieldType for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
        Ok(FieldValue::Float(*self))
    }

    fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
        match value {
            FieldValue::Float(f) => Ok(f),
            other => Err(other.mismatch()),
        }
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Double;

    fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
        Ok(FieldValue::Double(*self))
    }

    fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
        match value {
            FieldValue::Double(d) => Ok(d),
            other => Err(other.mismatch()),
        }
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
        Ok(FieldValue::Text(self.clone()))
    }

    fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
        match value {
            FieldValue::Text(s) => Ok(s),
            other => Err(other.mismatch()),
        }
    }
}

impl FieldType for Vec<u8> {
    const KIND: FieldKind = FieldKind::Blob;

    fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
        Ok(FieldValue::Blob(self.clone()))
    }

    fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
        match value {
            FieldValue::Blob(b) => Ok(b),
            other => Err(other.mismatch()),
        }
    }
}

impl FieldType for Uuid {
    const KIND: FieldKind = FieldKind::Text;

    fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
        Ok(FieldValue::Text(self.hyphenated().to_string()))
    }

    fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
        match value {
            FieldValue::Text(s) => {
                Uuid::parse_str(&s).map_err(|_| FieldError::TypeMismatch(format!("text({s:?})")))
            }
            other => Err(other.mismatch()),
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_field(&self, context: &CodingContext) -> Result<FieldValue, FieldError> {
        // None of an unsupported width is still unsupported
        if let FieldKind::Unsupported { type_name, width } = T::KIND {
            return Err(FieldError::Unsupported { type_name, width });
        }
        match self {
            Some(inner) => inner.to_field(context),
            None => Ok(FieldValue::Null),
        }
    }

    fn from_field(value: FieldValue, context: &CodingContext) -> Result<Self, FieldError> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field(other, context).map(Some),
        }
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

// ============================================================================
// Temporal impls
// ============================================================================

macro_rules! temporal_field {
    ($ty:ty, $kind:ident) => {
        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::Temporal(TemporalKind::$kind);

            fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
                Ok(FieldValue::Temporal(TemporalValue::$kind(*self)))
            }

            fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
                match value {
                    FieldValue::Temporal(TemporalValue::$kind(v)) => Ok(v),
                    other => Err(other.mismatch()),
                }
            }
        }
    };
}

temporal_field!(DateTime<Utc>, Timestamp);
temporal_field!(NaiveDateTime, DateTime);
temporal_field!(NaiveDate, Date);

// ============================================================================
// Unsupported integer widths
// ============================================================================

macro_rules! unsupported_integer {
    ($($ty:ty => $bits:expr),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::Unsupported {
                    type_name: stringify!($ty),
                    width: $bits,
                };

                fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
                    Err(FieldError::Unsupported { type_name: stringify!($ty), width: $bits })
                }

                fn from_field(_value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
                    Err(FieldError::Unsupported { type_name: stringify!($ty), width: $bits })
                }
            }
        )*
    };
}

unsupported_integer!(
    i8 => 8,
    i16 => 16,
    i32 => 32,
    isize => usize::BITS,
    u8 => 8,
    u16 => 16,
    u32 => 32,
    u64 => 64,
    usize => usize::BITS,
);

// ============================================================================
// Raw-representable and structured helpers
// ============================================================================

/// Encode a raw-representable value using its resolved kind
pub fn encode_raw<T: RawRepresentable>(value: &T) -> Result<FieldValue, FieldError> {
    let kind = RawKind::resolve(T::RAW_KINDS)
        .ok_or_else(|| FieldError::TypeMismatch("no raw kind declared".to_owned()))?;
    let raw = value
        .to_raw(kind)
        .ok_or_else(|| FieldError::TypeMismatch(format!("no {kind} raw value")))?;
    if raw.kind() != kind {
        return Err(FieldError::TypeMismatch(format!(
            "{raw} where {kind} was declared"
        )));
    }
    Ok(FieldValue::Raw(raw))
}

/// Construct a raw-representable value through its failable constructor
pub fn decode_raw<T: RawRepresentable>(value: FieldValue) -> Result<T, FieldError> {
    match value {
        FieldValue::Raw(raw) => {
            let shown = raw.to_string();
            T::from_raw(raw).ok_or(FieldError::TypeMismatch(shown))
        }
        other => Err(other.mismatch()),
    }
}

/// Serialize a structured value to JSON text
pub fn encode_structured<T: Serialize>(value: &T) -> Result<FieldValue, FieldError> {
    serde_json::to_string(value)
        .map(FieldValue::Structured)
        .map_err(|e| FieldError::Serialization(e.to_string()))
}

/// Deserialize a structured value from JSON text
pub fn decode_structured<T: DeserializeOwned>(value: FieldValue) -> Result<T, FieldError> {
    match value {
        FieldValue::Structured(json) => {
            serde_json::from_str(&json).map_err(|e| FieldError::Corrupt(e.to_string()))
        }
        other => Err(other.mismatch()),
    }
}

/// Wrapper storing any serde type as JSON text
///
/// ```
/// use rowmap_core::{CodingContext, FieldType, Json};
///
/// let tags = Json(vec!["a".to_string(), "b".to_string()]);
/// let value = tags.to_field(&CodingContext::new()).unwrap();
/// assert_eq!(value.into_column().as_text(), Some(r#"["a","b"]"#));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Json(value)
    }
}

impl<T: Serialize + DeserializeOwned> FieldType for Json<T> {
    const KIND: FieldKind = FieldKind::Structured;

    fn to_field(&self, _context: &CodingContext) -> Result<FieldValue, FieldError> {
        encode_structured(&self.0)
    }

    fn from_field(value: FieldValue, _context: &CodingContext) -> Result<Self, FieldError> {
        decode_structured(value).map(Json)
    }
}

/// Register raw-representable types as field types
#[macro_export]
macro_rules! raw_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldType for $ty {
                const KIND: $crate::FieldKind =
                    $crate::FieldKind::raw_of(<$ty as $crate::RawRepresentable>::RAW_KINDS);

                fn to_field(
                    &self,
                    _context: &$crate::CodingContext,
                ) -> ::std::result::Result<$crate::FieldValue, $crate::FieldError> {
                    $crate::field::encode_raw(self)
                }

                fn from_field(
                    value: $crate::FieldValue,
                    _context: &$crate::CodingContext,
                ) -> ::std::result::Result<Self, $crate::FieldError> {
                    $crate::field::decode_raw(value)
                }
            }
        )+
    };
}

/// Register serde types as structured (JSON text) field types
#[macro_export]
macro_rules! json_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldType for $ty {
                const KIND: $crate::FieldKind = $crate::FieldKind::Structured;

                fn to_field(
                    &self,
                    _context: &$crate::CodingContext,
                ) -> ::std::result::Result<$crate::FieldValue, $crate::FieldError> {
                    $crate::field::encode_structured(self)
                }

                fn from_field(
                    value: $crate::FieldValue,
                    _context: &$crate::CodingContext,
                ) -> ::std::result::Result<Self, $crate::FieldError> {
                    $crate::field::decode_structured(value)
                }
            }
        )+
    };
}
