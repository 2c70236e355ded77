//! Main database entry point for rowmap.
//!
//! [`Database`] pairs a rusqlite connection with key management and the
//! record codec, so records go in and out of tables without hand-written
//! column lists.

use crate::error::{Error, Result};
use rowmap_codec::{encode_many, encode_with, Record};
use rowmap_core::{Assignment, CodingContext};
use rowmap_security::{KeyError, KeyMaterial, KeyOptions, KeyState, KeyedConnection};
use rowmap_sqlite::{decode_row_with, insert, insert_many, select_statement, SqliteEngine};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A row store connection with record mapping and key management.
///
/// # Example
///
/// ```ignore
/// use rowmap::prelude::*;
///
/// record! {
///     pub struct User { pub id: i64, pub name: String }
/// }
///
/// let mut db = Database::builder().path("./app.db").open_with_key("passphrase")?;
/// db.execute("CREATE TABLE IF NOT EXISTS users (id INTEGER, name TEXT)")?;
/// db.insert("users", &User { id: 1, name: "Ada".into() })?;
/// let users: Vec<User> = db.select("users")?;
/// ```
pub struct Database {
    conn: KeyedConnection<SqliteEngine>,
    context: CodingContext,
}

impl Database {
    /// Open an unkeyed database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Open an unkeyed in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::builder().open()
    }

    /// Open a database at `path` and install `key`.
    pub fn open_encrypted<'k>(
        path: impl AsRef<Path>,
        key: impl Into<KeyMaterial<'k>>,
    ) -> Result<Self> {
        Self::builder().path(path).open_with_key(key)
    }

    /// Create a builder for database configuration.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Install a key on the configured database and verify it.
    pub fn install_key<'k>(&mut self, key: impl Into<KeyMaterial<'k>>) -> Result<KeyState> {
        Ok(self.conn.install(key)?)
    }

    /// Install a key on an attached database.
    pub fn install_key_in<'k>(
        &mut self,
        database: &str,
        key: impl Into<KeyMaterial<'k>>,
    ) -> Result<KeyState> {
        Ok(self.conn.install_in(database, key)?)
    }

    /// Re-encrypt the configured database under a new key.
    pub fn rekey<'k>(&mut self, key: impl Into<KeyMaterial<'k>>) -> Result<()> {
        Ok(self.conn.rekey(key)?)
    }

    /// Key state of the configured database.
    pub fn key_state(&self) -> KeyState {
        self.conn.state()
    }

    /// Cipher library version, `None` without cipher support.
    pub fn cipher_version(&mut self) -> Result<Option<String>> {
        Ok(self.conn.cipher_version()?)
    }

    /// SQLite library version.
    pub fn engine_version(&mut self) -> Result<Option<String>> {
        Ok(self.conn.engine_version()?)
    }

    /// Write an encrypted copy of the database to `path`.
    pub fn export<'k>(&mut self, path: impl AsRef<Path>, key: impl Into<KeyMaterial<'k>>) -> Result<()> {
        let path = path
            .as_ref()
            .to_str()
            .ok_or_else(|| KeyError::Format("export path is not valid UTF-8".into()))?;
        Ok(self.conn.export(path, key)?)
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Run one or more statements.
    pub fn execute(&self, sql: &str) -> Result<()> {
        Ok(self.connection().execute_batch(sql)?)
    }

    /// Encode `record` and insert it into `table`.
    pub fn insert<R: Record>(&self, table: &str, record: &R) -> Result<usize> {
        self.insert_with(table, record, std::iter::empty())
    }

    /// Encode `record`, append `extra` assignments, and insert.
    ///
    /// Extra assignments override record fields with the same column.
    pub fn insert_with<R, I>(&self, table: &str, record: &R, extra: I) -> Result<usize>
    where
        R: Record,
        I: IntoIterator<Item = Assignment>,
    {
        let assignments = encode_with(record, &self.context, extra)?;
        Ok(insert(self.connection(), table, &assignments)?)
    }

    /// Insert several records in one transaction.
    ///
    /// Every record is encoded before anything is written.
    pub fn insert_many<R: Record>(&mut self, table: &str, records: &[R]) -> Result<usize> {
        let encoded = encode_many(records, &self.context)?;
        debug!(table, records = encoded.len(), "insert many");
        Ok(insert_many(self.conn.engine_mut().connection_mut(), table, &encoded)?)
    }

    /// Read every row of `table` as `R`.
    pub fn select<R: Record>(&self, table: &str) -> Result<Vec<R>> {
        let schema = R::schema()?;
        self.query(&select_statement(table, &schema), [])
    }

    /// Run a query and decode each row as `R`.
    ///
    /// The first row that fails to decode aborts the query.
    pub fn query<R: Record, P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<R>> {
        let mut stmt = self.connection().prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(decode_row_with(row, &self.context).map_err(Error::from)?);
        }
        Ok(out)
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Side-channel data passed to every field conversion.
    pub fn context(&self) -> &CodingContext {
        &self.context
    }

    /// Mutable coding context.
    pub fn context_mut(&mut self) -> &mut CodingContext {
        &mut self.context
    }

    /// The underlying rusqlite connection.
    pub fn connection(&self) -> &Connection {
        self.conn.engine().connection()
    }

    /// Consume and return the rusqlite connection.
    pub fn into_connection(self) -> Connection {
        self.conn.into_engine().into_inner()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("conn", &self.conn)
            .field("context", &self.context)
            .finish()
    }
}

/// Builder for database configuration.
///
/// # Example
///
/// ```ignore
/// let db = Database::builder()
///     .path("./app.db")
///     .key_options(KeyOptions::new().verify(false))
///     .open_with_key(&raw_key[..])?;
/// ```
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    path: Option<PathBuf>,
    options: KeyOptions,
    context: CodingContext,
}

impl DatabaseBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database file path. Without one the database is in memory.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set key installation options.
    pub fn key_options(mut self, options: KeyOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the coding context.
    pub fn context(mut self, context: CodingContext) -> Self {
        self.context = context;
        self
    }

    /// Open without installing a key.
    pub fn open(self) -> Result<Database> {
        let engine = match &self.path {
            Some(path) => SqliteEngine::open(path)?,
            None => SqliteEngine::open_in_memory()?,
        };
        debug!(path = ?self.path, "opened database");
        Ok(Database {
            conn: KeyedConnection::with_options(engine, self.options),
            context: self.context,
        })
    }

    /// Open and install `key` before any other access.
    pub fn open_with_key<'k>(self, key: impl Into<KeyMaterial<'k>>) -> Result<Database> {
        let mut db = self.open()?;
        db.install_key(key)?;
        Ok(db)
    }
}
