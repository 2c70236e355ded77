//! Keyed connection state machine
//!
//! [`KeyedConnection`] owns a [`CipherEngine`] and tracks the key state of
//! every database it has touched:
//!
//! | From | Event | To |
//! |------|-------|----|
//! | any | install, verification passes | `Verified` |
//! | any | install with `verify = false` | `Keyed` |
//! | any | install fails (no cipher, engine or verification) | `Unkeyed` |
//! | `Keyed` / `Verified` | rekey succeeds | unchanged |
//! | `Keyed` / `Verified` | rekey fails | unchanged, prior key in effect |
//! | `Unkeyed` | rekey | error `NotKeyed` |
//!
//! The key-set primitive never checks the key against existing ciphertext,
//! so install runs a verification read and reports its failure as
//! [`KeyError::InvalidKey`]. An engine that would silently ignore the key
//! is refused with [`KeyError::CipherUnavailable`] before any key bytes are
//! handed over.

use crate::engine::CipherEngine;
use crate::error::KeyError;
use crate::key::{KeyFormatter, KeyMaterial};
use crate::options::KeyOptions;
use crate::wipe::{VolatileWipe, Wipe};
use rowmap_core::ColumnValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Attached name used while exporting
pub const EXPORT_SCHEMA: &str = "cipher_export";

/// Key state of one database on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyState {
    /// No key installed, or the last install failed
    #[default]
    Unkeyed,
    /// Key set without a verification read
    Keyed,
    /// Key set and the verification read succeeded
    Verified,
}

impl KeyState {
    /// Whether a key is in effect
    pub fn is_keyed(&self) -> bool {
        !matches!(self, KeyState::Unkeyed)
    }
}

/// Engine connection with per-database key state
pub struct KeyedConnection<E: CipherEngine, W: Wipe = VolatileWipe> {
    engine: E,
    options: KeyOptions,
    states: BTreeMap<String, KeyState>,
    formatter: KeyFormatter<W>,
}

impl<E: CipherEngine> KeyedConnection<E> {
    /// Wrap `engine` with default options
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, KeyOptions::default())
    }

    /// Wrap `engine` with `options`
    pub fn with_options(engine: E, options: KeyOptions) -> Self {
        Self::with_formatter(engine, options, KeyFormatter::new())
    }
}

impl<E: CipherEngine, W: Wipe> KeyedConnection<E, W> {
    /// Wrap `engine` with a custom formatter
    pub fn with_formatter(engine: E, options: KeyOptions, formatter: KeyFormatter<W>) -> Self {
        Self {
            engine,
            options,
            states: BTreeMap::new(),
            formatter,
        }
    }

    pub fn options(&self) -> &KeyOptions {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn formatter(&self) -> &KeyFormatter<W> {
        &self.formatter
    }

    /// State of the configured database
    pub fn state(&self) -> KeyState {
        self.state_of(&self.options.database)
    }

    /// State of `database`
    pub fn state_of(&self, database: &str) -> KeyState {
        self.states.get(database).copied().unwrap_or_default()
    }

    /// Install `key` on the configured database
    pub fn install<'k>(&mut self, key: impl Into<KeyMaterial<'k>>) -> Result<KeyState, KeyError> {
        let database = self.options.database.clone();
        self.install_in(&database, key)
    }

    /// Install `key` on `database`
    pub fn install_in<'k>(
        &mut self,
        database: &str,
        key: impl Into<KeyMaterial<'k>>,
    ) -> Result<KeyState, KeyError> {
        let key = key.into();
        debug!(database, form = key.form(), "installing key");

        match self.engine.cipher_available() {
            Ok(true) => {}
            Ok(false) => {
                warn!(database, "engine has no cipher support, key not installed");
                self.states.insert(database.to_owned(), KeyState::Unkeyed);
                return Err(KeyError::CipherUnavailable {
                    database: database.to_owned(),
                });
            }
            Err(e) => {
                self.states.insert(database.to_owned(), KeyState::Unkeyed);
                return Err(e.into());
            }
        }

        let engine = &mut self.engine;
        if let Err(e) = self.formatter.apply(key, |bytes| engine.set_key(database, bytes)) {
            self.states.insert(database.to_owned(), KeyState::Unkeyed);
            return Err(e);
        }

        let state = if self.options.verify {
            let sql = self.options.verification_statement(database);
            if let Err(e) = self.engine.scalar_query(&sql) {
                warn!(database, error = %e, "key verification read failed");
                self.states.insert(database.to_owned(), KeyState::Unkeyed);
                return Err(KeyError::InvalidKey {
                    database: database.to_owned(),
                    reason: e.message,
                });
            }
            KeyState::Verified
        } else {
            KeyState::Keyed
        };

        self.states.insert(database.to_owned(), state);
        Ok(state)
    }

    /// Re-encrypt the configured database under `key`
    pub fn rekey<'k>(&mut self, key: impl Into<KeyMaterial<'k>>) -> Result<(), KeyError> {
        let database = self.options.database.clone();
        self.rekey_in(&database, key)
    }

    /// Re-encrypt `database` under `key`
    ///
    /// No verification read: rekey assumes the database is already unlocked.
    pub fn rekey_in<'k>(
        &mut self,
        database: &str,
        key: impl Into<KeyMaterial<'k>>,
    ) -> Result<(), KeyError> {
        if !self.state_of(database).is_keyed() {
            return Err(KeyError::NotKeyed {
                database: database.to_owned(),
            });
        }
        let key = key.into();
        debug!(database, form = key.form(), "rekeying");

        let engine = &mut self.engine;
        self.formatter.apply(key, |bytes| engine.rekey(database, bytes))
    }

    /// Cipher library version, `None` on an engine without cipher support
    pub fn cipher_version(&mut self) -> Result<Option<String>, KeyError> {
        self.text_query("PRAGMA cipher_version;")
    }

    /// Engine library version
    pub fn engine_version(&mut self) -> Result<Option<String>, KeyError> {
        self.text_query("SELECT sqlite_version();")
    }

    fn text_query(&mut self, sql: &str) -> Result<Option<String>, KeyError> {
        match self.engine.scalar_query(sql)? {
            ColumnValue::Text(s) => Ok(Some(s)),
            ColumnValue::Null => Ok(None),
            other => Ok(Some(other.to_string())),
        }
    }

    /// Write an encrypted copy of the main database to `path` under `key`
    ///
    /// The export database is always detached, also when the copy fails.
    pub fn export<'k>(&mut self, path: &str, key: impl Into<KeyMaterial<'k>>) -> Result<(), KeyError> {
        let key = key.into();
        debug!(path, form = key.form(), "exporting database");

        let prefix = format!(
            "ATTACH DATABASE '{}' AS {EXPORT_SCHEMA} KEY ",
            path.replace('\'', "''")
        );
        let engine = &mut self.engine;
        self.formatter
            .apply_in_statement(key, &prefix, ";", |sql| engine.execute(sql))?;

        let copied = self
            .engine
            .scalar_query(&format!("SELECT sqlcipher_export('{EXPORT_SCHEMA}');"));
        let detached = self.engine.execute(&format!("DETACH DATABASE {EXPORT_SCHEMA};"));
        copied?;
        detached?;
        Ok(())
    }
}

impl<E: CipherEngine, W: Wipe> std::fmt::Debug for KeyedConnection<E, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedConnection")
            .field("options", &self.options)
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}
