//! `RowReader` over `rusqlite::Row`

use rowmap_codec::{decode_with, Record, RowError, RowReader};
use rowmap_core::{CodingContext, ColumnValue, MappingError};
use rusqlite::types::ValueRef;

/// Name-addressed view of a rusqlite result row
pub struct SqliteRow<'a, 'stmt> {
    row: &'a rusqlite::Row<'stmt>,
}

impl<'a, 'stmt> SqliteRow<'a, 'stmt> {
    pub fn new(row: &'a rusqlite::Row<'stmt>) -> Self {
        Self { row }
    }

    fn index(&self, column: &str) -> Result<usize, RowError> {
        self.row
            .as_ref()
            .column_index(column)
            .map_err(|e| match e {
                rusqlite::Error::InvalidColumnName(name) => RowError::NoSuchColumn(name),
                other => RowError::Engine(other.to_string()),
            })
    }
}

impl RowReader for SqliteRow<'_, '_> {
    fn has_column(&self, column: &str) -> bool {
        self.row.as_ref().column_index(column).is_ok()
    }

    fn value(&self, column: &str) -> Result<ColumnValue, RowError> {
        let idx = self.index(column)?;
        let cell = self
            .row
            .get_ref(idx)
            .map_err(|e| RowError::Engine(e.to_string()))?;
        column_value(column, cell)
    }
}

/// Convert a borrowed engine cell to an owned `ColumnValue`
pub fn column_value(column: &str, cell: ValueRef<'_>) -> Result<ColumnValue, RowError> {
    Ok(match cell {
        ValueRef::Null => ColumnValue::Null,
        ValueRef::Integer(n) => ColumnValue::Integer(n),
        ValueRef::Real(f) => ColumnValue::Real(f),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => ColumnValue::Text(s.to_owned()),
            Err(_) => {
                return Err(RowError::InvalidText {
                    column: column.to_owned(),
                })
            }
        },
        ValueRef::Blob(bytes) => ColumnValue::Blob(bytes.to_vec()),
    })
}

/// Decode a record from a rusqlite row
pub fn decode_row<T: Record>(row: &rusqlite::Row<'_>) -> Result<T, MappingError> {
    decode_row_with(row, &CodingContext::new())
}

/// Decode a record from a rusqlite row with a coding context
pub fn decode_row_with<T: Record>(
    row: &rusqlite::Row<'_>,
    context: &CodingContext,
) -> Result<T, MappingError> {
    decode_with(&SqliteRow::new(row), context)
}
