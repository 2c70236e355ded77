//! Record/row codec for rowmap
//!
//! This crate translates records into ordered column assignments and rows
//! back into records.
//!
//! ## Encoding
//!
//! ```text
//! record ──encode──▶ [Assignment] ──▶ statement builder ──▶ engine
//! ```
//!
//! ## Decoding
//!
//! ```text
//! engine row ──RowReader──▶ RowDecoder ──▶ record
//! ```
//!
//! Field storage is decided per declared type by
//! [`FieldType::KIND`](rowmap_core::FieldType::KIND); see `rowmap_core::field`
//! for the full table.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decode;
pub mod encode;
pub mod record;
pub mod row;

pub use decode::{decode, decode_with, RowDecoder};
pub use encode::{encode, encode_many, encode_with, RecordEncoder};
pub use record::Record;
pub use row::{RowError, RowReader, ValueRow};

// Re-exported for `record!` expansions and downstream convenience
pub use rowmap_core::{
    Assignment, CodingContext, ColumnValue, FieldDescriptor, FieldKind, FieldType, MappingError,
    Schema,
};
