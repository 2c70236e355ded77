//! Engine seam for keying
//!
//! The key subsystem drives the engine only through [`CipherEngine`]. The
//! `rowmap-sqlite` crate implements it over a rusqlite connection; tests use
//! scripted engines.

use crate::error::KeyError;
use rowmap_core::ColumnValue;
use thiserror::Error;

/// Failure reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    /// Engine result code, when it has one
    pub code: Option<i32>,
    /// Engine message
    pub message: String,
    /// Set when the engine could not zero its own copy of the key;
    /// the number of bytes left non-zero
    pub unwiped: Option<usize>,
}

impl EngineError {
    /// Error without a result code
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            unwiped: None,
        }
    }

    /// Error with an engine result code
    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            unwiped: None,
        }
    }

    /// Engine-side key buffer kept `remaining` non-zero bytes after its wipe
    pub fn wipe_failure(remaining: usize) -> Self {
        Self {
            code: None,
            message: format!("secure wipe of engine key buffer failed: {remaining} bytes not zeroed"),
            unwiped: Some(remaining),
        }
    }

    /// Check if key bytes may have been left in engine-side memory
    pub fn is_wipe_failure(&self) -> bool {
        self.unwiped.is_some()
    }
}

impl From<KeyError> for EngineError {
    fn from(e: KeyError) -> Self {
        match e {
            KeyError::Engine(inner) => inner,
            KeyError::SecureWipeFailure { remaining } => EngineError::wipe_failure(remaining),
            other => EngineError::new(other.to_string()),
        }
    }
}

/// Key-related primitives of an encrypted row-store engine
pub trait CipherEngine {
    /// Set the key for `database`; does not validate it against ciphertext
    fn set_key(&mut self, database: &str, key: &[u8]) -> Result<(), EngineError>;

    /// Re-encrypt `database` under a new key
    fn rekey(&mut self, database: &str, key: &[u8]) -> Result<(), EngineError>;

    /// Run a statement returning one value; no rows yields `ColumnValue::Null`
    fn scalar_query(&mut self, sql: &str) -> Result<ColumnValue, EngineError>;

    /// Run one or more statements, discarding any rows
    fn execute(&mut self, sql: &str) -> Result<(), EngineError>;

    /// Whether keys set on this engine actually encrypt
    ///
    /// An engine built without cipher support accepts the key-set call and
    /// ignores it; such an engine has no `cipher_version` row.
    fn cipher_available(&mut self) -> Result<bool, EngineError> {
        Ok(!matches!(
            self.scalar_query("PRAGMA cipher_version;")?,
            ColumnValue::Null
        ))
    }
}

impl<E: CipherEngine + ?Sized> CipherEngine for &mut E {
    fn set_key(&mut self, database: &str, key: &[u8]) -> Result<(), EngineError> {
        (**self).set_key(database, key)
    }

    fn rekey(&mut self, database: &str, key: &[u8]) -> Result<(), EngineError> {
        (**self).rekey(database, key)
    }

    fn scalar_query(&mut self, sql: &str) -> Result<ColumnValue, EngineError> {
        (**self).scalar_query(sql)
    }

    fn execute(&mut self, sql: &str) -> Result<(), EngineError> {
        (**self).execute(sql)
    }

    fn cipher_available(&mut self) -> Result<bool, EngineError> {
        (**self).cipher_available()
    }
}
