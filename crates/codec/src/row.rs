//! Row access
//!
//! The decoder reads rows only through [`RowReader`]: "does this column
//! exist", "is it null", and typed getters by column name. Engine adapters
//! implement it over their native row type; [`ValueRow`] is an in-memory row
//! built from values or assignments.

use rowmap_core::{Assignment, ColumnValue};
use thiserror::Error;

/// Row read failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// No column with this name in the row
    #[error("no such column: {0}")]
    NoSuchColumn(String),

    /// Column holds a different storage class than requested
    #[error("column {column} holds {actual}, expected {expected}")]
    WrongType {
        /// Column name
        column: String,
        /// Requested storage class
        expected: &'static str,
        /// Stored storage class
        actual: &'static str,
    },

    /// Text cell is not valid UTF-8
    #[error("column {column} holds text that is not valid UTF-8")]
    InvalidText {
        /// Column name
        column: String,
    },

    /// Engine-level failure
    #[error("row read failed: {0}")]
    Engine(String),
}

/// Typed, name-addressed access to one result row
pub trait RowReader {
    /// Whether the row has a column with this name
    fn has_column(&self, column: &str) -> bool;

    /// The raw cell value
    fn value(&self, column: &str) -> Result<ColumnValue, RowError>;

    /// Whether the cell is NULL
    fn is_null(&self, column: &str) -> Result<bool, RowError> {
        Ok(self.value(column)?.is_null())
    }

    /// Read an integer cell
    fn get_integer(&self, column: &str) -> Result<i64, RowError> {
        match self.value(column)? {
            ColumnValue::Integer(n) => Ok(n),
            other => Err(wrong_type(column, "integer", &other)),
        }
    }

    /// Read a real cell; integer cells are accepted and converted
    fn get_real(&self, column: &str) -> Result<f64, RowError> {
        match self.value(column)? {
            ColumnValue::Real(f) => Ok(f),
            ColumnValue::Integer(n) => Ok(n as f64),
            other => Err(wrong_type(column, "real", &other)),
        }
    }

    /// Read a text cell
    fn get_text(&self, column: &str) -> Result<String, RowError> {
        match self.value(column)? {
            ColumnValue::Text(s) => Ok(s),
            other => Err(wrong_type(column, "text", &other)),
        }
    }

    /// Read a blob cell
    fn get_blob(&self, column: &str) -> Result<Vec<u8>, RowError> {
        match self.value(column)? {
            ColumnValue::Blob(b) => Ok(b),
            other => Err(wrong_type(column, "blob", &other)),
        }
    }
}

fn wrong_type(column: &str, expected: &'static str, actual: &ColumnValue) -> RowError {
    RowError::WrongType {
        column: column.to_owned(),
        expected,
        actual: actual.type_name(),
    }
}

impl<R: RowReader + ?Sized> RowReader for &R {
    fn has_column(&self, column: &str) -> bool {
        (**self).has_column(column)
    }

    fn value(&self, column: &str) -> Result<ColumnValue, RowError> {
        (**self).value(column)
    }

    fn is_null(&self, column: &str) -> Result<bool, RowError> {
        (**self).is_null(column)
    }

    fn get_integer(&self, column: &str) -> Result<i64, RowError> {
        (**self).get_integer(column)
    }

    fn get_real(&self, column: &str) -> Result<f64, RowError> {
        (**self).get_real(column)
    }

    fn get_text(&self, column: &str) -> Result<String, RowError> {
        (**self).get_text(column)
    }

    fn get_blob(&self, column: &str) -> Result<Vec<u8>, RowError> {
        (**self).get_blob(column)
    }
}

/// An owned, in-memory row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow {
    cells: Vec<(String, ColumnValue)>,
}

impl ValueRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cell insert
    pub fn with(mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a cell, replacing any existing cell with the same name
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<ColumnValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Build the row an insert of these assignments would store
    ///
    /// Later assignments to the same column win.
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let mut row = Self::new();
        for a in assignments {
            row.set(a.column.clone(), a.value.clone());
        }
        row
    }

    /// Remove a cell
    pub fn remove(&mut self, column: &str) -> Option<ColumnValue> {
        let idx = self.cells.iter().position(|(name, _)| name == column)?;
        Some(self.cells.remove(idx).1)
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a row with no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<Assignment> for ValueRow {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        let mut row = Self::new();
        for a in iter {
            row.set(a.column, a.value);
        }
        row
    }
}

impl RowReader for ValueRow {
    fn has_column(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == column)
    }

    fn value(&self, column: &str) -> Result<ColumnValue, RowError> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| RowError::NoSuchColumn(column.to_owned()))
    }
}
