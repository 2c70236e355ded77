//! rusqlite adapters for rowmap
//!
//! - [`SqliteRow`]: [`RowReader`](rowmap_codec::RowReader) over `rusqlite::Row`
//! - [`insert`] / [`insert_many`]: bind encoded assignments to an `INSERT`
//! - [`SqliteEngine`]: [`CipherEngine`](rowmap_security::CipherEngine) over a
//!   `rusqlite::Connection`

#![warn(clippy::all)]

pub mod cipher;
pub mod params;
pub mod row;

pub use cipher::{engine_error, SqliteEngine};
pub use params::{
    collapse, insert, insert_many, insert_statement, quote_ident, select_statement, to_sql_value,
};
pub use row::{column_value, decode_row, decode_row_with, SqliteRow};
