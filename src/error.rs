//! Unified error types for rowmap.
//!
//! Member crates each report their own error enum. This module folds them
//! into one type for callers that use the facade.

use rowmap_core::MappingError;
use rowmap_security::KeyError;
use thiserror::Error;

/// All rowmap errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Record encode or decode failed
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Key install, rekey or export failed
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// Engine error outside the key subsystem
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for rowmap operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this came from the key subsystem.
    pub fn is_key_error(&self) -> bool {
        matches!(self, Error::Key(_))
    }

    /// Check if this came from the record bridge.
    pub fn is_mapping_error(&self) -> bool {
        matches!(self, Error::Mapping(_))
    }

    /// Check if a key failed verification.
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Error::Key(e) if e.is_invalid_key())
    }

    /// Name of the field a mapping error refers to.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Mapping(e) => Some(e.field()),
            _ => None,
        }
    }
}
