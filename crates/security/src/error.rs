//! Key subsystem errors

use crate::engine::EngineError;
use thiserror::Error;

/// Key install, rekey and export errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The verification read failed after the key was set
    #[error("invalid key for database `{database}`: {reason}")]
    InvalidKey {
        /// Database name the key was installed on
        database: String,
        /// Engine message from the failed verification read
        reason: String,
    },

    /// The key scratch buffer was not fully zeroed
    #[error("secure wipe of key scratch buffer failed: {remaining} bytes not zeroed")]
    SecureWipeFailure {
        /// Bytes still non-zero after the wipe
        remaining: usize,
    },

    /// Key material could not be formatted
    #[error("key formatting failed: {0}")]
    Format(String),

    /// Operation needs a key that was never installed
    #[error("database `{database}` has no key installed")]
    NotKeyed {
        /// Database name
        database: String,
    },

    /// The engine accepts keys but does not encrypt
    #[error("database `{database}` cannot be keyed: engine has no cipher support")]
    CipherUnavailable {
        /// Database name
        database: String,
    },

    /// The engine rejected a key-set, rekey or export call
    #[error("engine error: {0}")]
    Engine(EngineError),
}

impl From<EngineError> for KeyError {
    fn from(e: EngineError) -> Self {
        match e.unwiped {
            Some(remaining) => KeyError::SecureWipeFailure { remaining },
            None => KeyError::Engine(e),
        }
    }
}

impl KeyError {
    /// Check if this is a wrong-key error
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, KeyError::InvalidKey { .. })
    }

    /// Check if key bytes may have been left in memory
    pub fn is_wipe_failure(&self) -> bool {
        matches!(self, KeyError::SecureWipeFailure { .. })
    }
}
