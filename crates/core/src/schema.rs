//! Record shapes
//!
//! A [`Schema`] is the ordered list of a record's top-level fields, each with
//! its storage kind resolved from the declared Rust type. Field keys are the
//! declared field names and double as column names.

use crate::error::MappingError;
use crate::field::{FieldKind, FieldType};
use std::collections::HashSet;

/// One field of a record shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field key, equal to the column name
    pub name: String,
    /// Resolved storage kind
    pub kind: FieldKind,
    /// Whether NULL / missing decodes to none
    pub nullable: bool,
}

impl FieldDescriptor {
    /// Describe a field of type `T`
    pub fn of<T: FieldType>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: T::KIND,
            nullable: T::NULLABLE,
        }
    }
}

/// Ordered, key-unique list of field descriptors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Build a schema, rejecting duplicate field keys
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, MappingError> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(MappingError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by key
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Column names in declaration order, e.g. for a `SELECT` list
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a record with no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
