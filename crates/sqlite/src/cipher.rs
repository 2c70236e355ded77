//! `CipherEngine` over a rusqlite connection
//!
//! Keys reach the engine through `PRAGMA "<db>".key = '<key>'` and
//! `PRAGMA "<db>".rekey = '<key>'`. The statement text is assembled in a
//! [`ScratchBuffer`] that is zeroed once the pragma has run. Copies made by
//! the engine while parsing the statement are outside our control.
//!
//! The workspace links rusqlite against bundled SQLCipher. A SQLite build
//! without cipher support would ignore both pragmas; it has no row for
//! `PRAGMA cipher_version`, which `KeyedConnection` checks before installing.

use super::row::column_value;
use rowmap_core::ColumnValue;
use rowmap_security::{
    quoted_statement, settle, CipherEngine, EngineError, KeyError, ScratchBuffer, VolatileWipe,
    Wipe,
};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Convert a rusqlite error, keeping the extended result code
pub fn engine_error(e: rusqlite::Error) -> EngineError {
    match e {
        rusqlite::Error::SqliteFailure(ffi, message) => EngineError::with_code(
            ffi.extended_code,
            message.unwrap_or_else(|| ffi.to_string()),
        ),
        other => EngineError::new(other.to_string()),
    }
}

/// Cipher-capable engine backed by one rusqlite connection
#[derive(Debug)]
pub struct SqliteEngine<W: Wipe = VolatileWipe> {
    conn: Connection,
    wiper: W,
}

impl SqliteEngine {
    pub fn new(conn: Connection) -> Self {
        Self::with_wiper(conn, VolatileWipe)
    }

    /// Open a file database
    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        Connection::open(path).map(Self::new)
    }

    /// Open with explicit flags
    pub fn open_with_flags(path: impl AsRef<Path>, flags: OpenFlags) -> rusqlite::Result<Self> {
        Connection::open_with_flags(path, flags).map(Self::new)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Connection::open_in_memory().map(Self::new)
    }
}

impl<W: Wipe> SqliteEngine<W> {
    /// Wrap `conn`, zeroing pragma text with `wiper`
    pub fn with_wiper(conn: Connection, wiper: W) -> Self {
        Self { conn, wiper }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }

    fn key_pragma(&self, pragma: &str, database: &str, key: &[u8]) -> Result<(), EngineError> {
        let prefix = format!("PRAGMA \"{}\".{pragma} = ", database.replace('"', "\"\""));
        let mut scratch: ScratchBuffer = quoted_statement(&prefix, key, ";");

        let result = match std::str::from_utf8(scratch.as_bytes()) {
            Ok(sql) => self.conn.execute_batch(sql).map_err(engine_error),
            Err(_) => Err(EngineError::new("key bytes are not valid UTF-8")),
        };
        let wiped = scratch.wipe_with(&self.wiper);
        settle(result.map_err(KeyError::from), wiped).map_err(EngineError::from)
    }
}

impl From<Connection> for SqliteEngine {
    fn from(conn: Connection) -> Self {
        Self::new(conn)
    }
}

impl<W: Wipe> CipherEngine for SqliteEngine<W> {
    fn set_key(&mut self, database: &str, key: &[u8]) -> Result<(), EngineError> {
        self.key_pragma("key", database, key)
    }

    fn rekey(&mut self, database: &str, key: &[u8]) -> Result<(), EngineError> {
        self.key_pragma("rekey", database, key)
    }

    fn scalar_query(&mut self, sql: &str) -> Result<ColumnValue, EngineError> {
        let mut stmt = self.conn.prepare(sql).map_err(engine_error)?;
        let mut rows = stmt.query([]).map_err(engine_error)?;
        let value = match rows.next().map_err(engine_error)? {
            Some(row) => {
                let cell = row.get_ref(0).map_err(engine_error)?;
                column_value("0", cell).map_err(|e| EngineError::new(e.to_string()))?
            }
            None => ColumnValue::Null,
        };
        Ok(value)
    }

    fn execute(&mut self, sql: &str) -> Result<(), EngineError> {
        self.conn.execute_batch(sql).map_err(engine_error)
    }
}
