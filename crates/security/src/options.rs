//! Key installation options

use serde::{Deserialize, Serialize};

/// Database name used when none is given
pub const DEFAULT_DATABASE: &str = "main";

/// Read that touches the schema page; fails under a wrong key
pub const VERIFICATION_SQL: &str = "SELECT count(*) FROM sqlite_master;";

/// Options for installing a key.
///
/// Use the builder pattern to configure options:
///
/// ```ignore
/// use rowmap_security::KeyOptions;
///
/// let opts = KeyOptions::new().database("archive").verify(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyOptions {
    /// Attached database the key applies to
    pub database: String,
    /// Run a verification read after setting the key
    pub verify: bool,
    /// Replaces the default verification statement
    pub verification_sql: Option<String>,
}

impl KeyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn verification_sql(mut self, sql: impl Into<String>) -> Self {
        self.verification_sql = Some(sql.into());
        self
    }

    /// Statement used to verify a key on `database`
    ///
    /// Non-main databases read their own schema table so the check hits the
    /// attached file rather than `main`.
    pub fn verification_statement(&self, database: &str) -> String {
        if let Some(sql) = &self.verification_sql {
            return sql.clone();
        }
        if database == DEFAULT_DATABASE {
            VERIFICATION_SQL.to_owned()
        } else {
            format!(
                "SELECT count(*) FROM \"{}\".sqlite_master;",
                database.replace('"', "\"\"")
            )
        }
    }
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_owned(),
            verify: true,
            verification_sql: None,
        }
    }
}
