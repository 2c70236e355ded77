//! Error types for the record bridge
//!
//! Every failure in encoding or decoding a record is reported as a
//! [`MappingError`] naming the field it happened on. There is no local
//! recovery: a failed field aborts the whole record.

use thiserror::Error;

/// Record encode/decode errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Field type or integer width the bridge intentionally does not support
    #[error("field `{field}` has unsupported type {type_name} ({width}-bit)")]
    UnsupportedType {
        /// Field name
        field: String,
        /// Declared Rust type
        type_name: &'static str,
        /// Declared width in bits
        width: u32,
    },

    /// Required column is not present in the row
    #[error("missing column for required field `{field}`")]
    MissingColumn {
        /// Field name
        field: String,
    },

    /// Non-optional field maps to a NULL cell
    #[error("unexpected null in non-optional field `{field}`")]
    UnexpectedNull {
        /// Field name
        field: String,
    },

    /// Stored value does not fit the target type
    #[error("type mismatch in field `{field}`: found {found}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Description of the value that was read
        found: String,
    },

    /// Structured payload present but not parseable into the target shape
    #[error("corrupt data in field `{field}`: {reason}")]
    CorruptData {
        /// Field name
        field: String,
        /// Parser message
        reason: String,
    },

    /// Structured value could not be serialized
    #[error("failed to serialize field `{field}`: {reason}")]
    SerializationError {
        /// Field name
        field: String,
        /// Serializer message
        reason: String,
    },

    /// The row reader itself failed
    #[error("failed to read column for field `{field}`: {reason}")]
    RowRead {
        /// Field name
        field: String,
        /// Reader message
        reason: String,
    },

    /// Two fields in one schema share a key
    #[error("duplicate field `{field}` in record schema")]
    DuplicateField {
        /// Field name
        field: String,
    },
}

impl MappingError {
    /// The field this error is about
    pub fn field(&self) -> &str {
        match self {
            MappingError::UnsupportedType { field, .. }
            | MappingError::MissingColumn { field }
            | MappingError::UnexpectedNull { field }
            | MappingError::TypeMismatch { field, .. }
            | MappingError::CorruptData { field, .. }
            | MappingError::SerializationError { field, .. }
            | MappingError::RowRead { field, .. }
            | MappingError::DuplicateField { field } => field,
        }
    }

    /// Check if this is an unsupported-type error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, MappingError::UnsupportedType { .. })
    }

    /// Check if the row lacked a value the target required
    pub fn is_missing_value(&self) -> bool {
        matches!(
            self,
            MappingError::MissingColumn { .. } | MappingError::UnexpectedNull { .. }
        )
    }
}

/// A field conversion failure before the field name is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Unsupported integer width
    Unsupported {
        /// Declared Rust type
        type_name: &'static str,
        /// Width in bits
        width: u32,
    },
    /// Value of the wrong shape
    TypeMismatch(String),
    /// Structured payload did not parse
    Corrupt(String),
    /// Structured value did not serialize
    Serialization(String),
}

impl FieldError {
    /// Attach the field name
    pub fn at(self, field: &str) -> MappingError {
        let field = field.to_owned();
        match self {
            FieldError::Unsupported { type_name, width } => MappingError::UnsupportedType {
                field,
                type_name,
                width,
            },
            FieldError::TypeMismatch(found) => MappingError::TypeMismatch { field, found },
            FieldError::Corrupt(reason) => MappingError::CorruptData { field, reason },
            FieldError::Serialization(reason) => MappingError::SerializationError { field, reason },
        }
    }
}
