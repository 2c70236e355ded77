//! Cipher key handling for rowmap
//!
//! This crate formats key material for an encrypted row-store engine, installs
//! and rekeys it, and wipes every intermediate buffer that held key bytes.
//!
//! ## Flow
//!
//! ```text
//! KeyMaterial ──KeyFormatter──▶ ScratchBuffer ──CipherEngine::set_key──▶ engine
//!                                    │
//!                                    └── zeroed + verified on every exit path
//! ```
//!
//! [`KeyedConnection`] adds the verification read and tracks per-database
//! [`KeyState`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connection;
pub mod engine;
pub mod error;
pub mod key;
pub mod options;
pub mod wipe;

pub use connection::{KeyState, KeyedConnection, EXPORT_SCHEMA};
pub use engine::{CipherEngine, EngineError};
pub use error::KeyError;
pub use key::{
    hex_literal_len, quoted_statement, settle, sql_quoted_len, write_hex_literal, KeyFormatter,
    KeyMaterial,
};
pub use options::{KeyOptions, DEFAULT_DATABASE, VERIFICATION_SQL};
pub use wipe::{ScratchBuffer, VolatileWipe, Wipe};
