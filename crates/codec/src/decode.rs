//! Row decoding
//!
//! Rebuilds a record from a row, one field at a time. For each field:
//!
//! 1. Unsupported integer widths fail before the row is touched.
//! 2. A missing column yields none for optional fields, else `MissingColumn`.
//! 3. A NULL cell yields none for optional fields, else `UnexpectedNull`.
//! 4. Otherwise the cell is read with the getter matching the field kind
//!    and handed to the type's conversion.
//!
//! The first failing field aborts the record; nothing partial is returned.

use crate::record::Record;
use crate::row::{RowError, RowReader};
use rowmap_core::{
    CodingContext, FieldKind, FieldType, FieldValue, MappingError, RawKind, RawValue,
    TemporalValue,
};
use tracing::trace;

/// Reads typed fields out of one row
pub struct RowDecoder<'r, R: RowReader + ?Sized> {
    row: &'r R,
    context: &'r CodingContext,
}

impl<'r, R: RowReader + ?Sized> RowDecoder<'r, R> {
    /// Create a decoder over `row`
    pub fn new(row: &'r R, context: &'r CodingContext) -> Self {
        Self { row, context }
    }

    /// The side-channel context
    pub fn context(&self) -> &CodingContext {
        self.context
    }

    /// The underlying row
    pub fn row(&self) -> &R {
        self.row
    }

    /// Decode the field stored in column `name`
    pub fn field<T: FieldType>(&self, name: &str) -> Result<T, MappingError> {
        if let FieldKind::Unsupported { type_name, width } = T::KIND {
            return Err(MappingError::UnsupportedType {
                field: name.to_owned(),
                type_name,
                width,
            });
        }

        if !self.row.has_column(name) {
            return T::absent().ok_or_else(|| MappingError::MissingColumn {
                field: name.to_owned(),
            });
        }

        if self.row.is_null(name).map_err(|e| row_error(name, e))? {
            return T::absent().ok_or_else(|| MappingError::UnexpectedNull {
                field: name.to_owned(),
            });
        }

        let value = self.read(name, T::KIND)?;
        T::from_field(value, self.context).map_err(|e| e.at(name))
    }

    fn read(&self, name: &str, kind: FieldKind) -> Result<FieldValue, MappingError> {
        let row = self.row;
        let value = match kind {
            FieldKind::NativeInt => row.get_integer(name).map(FieldValue::NativeInt),
            FieldKind::Bool => row.get_integer(name).map(|n| FieldValue::Bool(n != 0)),
            FieldKind::Float => row.get_real(name).map(|f| FieldValue::Float(f as f32)),
            FieldKind::Double => row.get_real(name).map(FieldValue::Double),
            FieldKind::Text => row.get_text(name).map(FieldValue::Text),
            FieldKind::Blob => row.get_blob(name).map(FieldValue::Blob),
            FieldKind::Structured => row.get_text(name).map(FieldValue::Structured),
            FieldKind::Raw(raw) => read_raw(row, name, raw).map(FieldValue::Raw),
            FieldKind::Temporal(temporal) => {
                let text = row.get_text(name).map_err(|e| row_error(name, e))?;
                return TemporalValue::from_storage(temporal, &text)
                    .map(FieldValue::Temporal)
                    .map_err(|_| MappingError::TypeMismatch {
                        field: name.to_owned(),
                        found: format!("text({text:?})"),
                    });
            }
            FieldKind::Unsupported { type_name, width } => {
                return Err(MappingError::UnsupportedType {
                    field: name.to_owned(),
                    type_name,
                    width,
                })
            }
        };
        value.map_err(|e| row_error(name, e))
    }
}

fn read_raw<R: RowReader + ?Sized>(
    row: &R,
    name: &str,
    kind: RawKind,
) -> Result<RawValue, RowError> {
    match kind {
        RawKind::Int => row.get_integer(name).map(RawValue::Int),
        RawKind::Bool => row.get_integer(name).map(|n| RawValue::Bool(n != 0)),
        RawKind::Float => row.get_real(name).map(|f| RawValue::Float(f as f32)),
        RawKind::Double => row.get_real(name).map(RawValue::Double),
        RawKind::String => row.get_text(name).map(RawValue::String),
    }
}

fn row_error(field: &str, err: RowError) -> MappingError {
    let field = field.to_owned();
    match err {
        RowError::NoSuchColumn(_) => MappingError::MissingColumn { field },
        RowError::WrongType { actual, .. } => MappingError::TypeMismatch {
            field,
            found: actual.to_owned(),
        },
        RowError::InvalidText { .. } => MappingError::CorruptData {
            field,
            reason: "text is not valid UTF-8".to_owned(),
        },
        RowError::Engine(reason) => MappingError::RowRead { field, reason },
    }
}

/// Decode a record with an empty context
pub fn decode<T: Record, R: RowReader + ?Sized>(row: &R) -> Result<T, MappingError> {
    decode_with(row, &CodingContext::new())
}

/// Decode a record, exposing `context` to field conversions
pub fn decode_with<T: Record, R: RowReader + ?Sized>(
    row: &R,
    context: &CodingContext,
) -> Result<T, MappingError> {
    let schema = T::schema()?;
    let decoder = RowDecoder::new(row, context);
    let record = T::decode_fields(&decoder)?;
    trace!(fields = schema.len(), "decoded record");
    Ok(record)
}
