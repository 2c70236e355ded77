//! Core types for rowmap
//!
//! This crate holds the vocabulary shared by the record bridge and the key
//! subsystem:
//!
//! - [`ColumnValue`] and [`Assignment`]: what a row-store cell holds and what
//!   statement construction consumes
//! - [`FieldType`], [`FieldKind`], [`FieldValue`]: per-type storage conversions
//!   resolved once per declared type
//! - [`RawRepresentable`] and [`RawKind`]: scalar-backed user types
//! - [`Schema`] and [`FieldDescriptor`]: record shapes
//! - [`MappingError`]: the encode/decode error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assignment;
pub mod context;
pub mod error;
pub mod field;
pub mod raw;
pub mod schema;
pub mod temporal;
pub mod value;

pub use assignment::Assignment;
pub use context::CodingContext;
pub use error::{FieldError, MappingError};
pub use field::{FieldKind, FieldType, FieldValue, Json};
pub use raw::{resolved_kind, RawKind, RawRepresentable, RawValue};
pub use schema::{FieldDescriptor, Schema};
pub use temporal::{TemporalKind, TemporalValue};
pub use value::ColumnValue;
