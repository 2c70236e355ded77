//! Column assignments
//!
//! An [`Assignment`] is the unit handed to statement construction: a column
//! name and the value to write into it. Encoders produce them in field
//! declaration order; duplicates are kept as-is and resolved (last writer
//! wins) by whoever builds the statement.

use crate::value::ColumnValue;
use std::fmt;

/// A `column = value` pair for an insert or update
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Column name
    pub column: String,
    /// Value to store
    pub value: ColumnValue,
}

impl Assignment {
    /// Create a new assignment
    pub fn new(column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create an assignment that writes NULL
    pub fn null(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: ColumnValue::Null,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.column, self.value)
    }
}
