//! # rowmap
//!
//! Record-to-column mapping and cipher key management for SQLite row stores.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rowmap::prelude::*;
//!
//! record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Note {
//!         pub id: i64,
//!         pub body: String,
//!         pub pinned: Option<bool>,
//!     }
//! }
//!
//! let mut db = Database::open_encrypted("./notes.db", "correct horse")?;
//! db.execute("CREATE TABLE IF NOT EXISTS notes (id INTEGER, body TEXT, pinned INTEGER)")?;
//! db.insert("notes", &Note { id: 1, body: "hi".into(), pinned: None })?;
//! let notes: Vec<Note> = db.select("notes")?;
//! ```
//!
//! ## Crates
//!
//! | Crate | Role |
//! |-------|------|
//! | [`rowmap_core`] | Column values, field kinds, raw-representable types, schemas, errors |
//! | [`rowmap_codec`] | Record trait, encoder, decoder, row access |
//! | [`rowmap_security`] | Key formatting, install, rekey, export, scratch wipe |
//! | [`rowmap_sqlite`] | rusqlite adapters |

#![warn(missing_docs)]

mod database;
mod error;

pub mod prelude;

// Re-export main entry points
pub use database::{Database, DatabaseBuilder};
pub use error::{Error, Result};

// Member crates
pub use rowmap_codec;
pub use rowmap_core;
pub use rowmap_security;
pub use rowmap_sqlite;

// Macros
pub use rowmap_codec::record;
pub use rowmap_core::{json_field, raw_field};

// Common types
pub use rowmap_codec::{decode, decode_with, encode, encode_many, encode_with, Record, RowReader, ValueRow};
pub use rowmap_core::{
    Assignment, CodingContext, ColumnValue, FieldKind, FieldType, Json, MappingError, RawKind,
    RawRepresentable, RawValue, Schema,
};
pub use rowmap_security::{KeyError, KeyMaterial, KeyOptions, KeyState};
