//! Record encoding
//!
//! Walks a record's fields in declaration order and emits one
//! [`Assignment`] per field. Encoding does no I/O; the first failing field
//! aborts the record.

use crate::record::Record;
use rowmap_core::{Assignment, CodingContext, FieldType, MappingError};
use tracing::trace;

/// Collects assignments for one record
#[derive(Debug)]
pub struct RecordEncoder<'c> {
    context: &'c CodingContext,
    assignments: Vec<Assignment>,
}

impl<'c> RecordEncoder<'c> {
    /// Create an encoder reading side-channel data from `context`
    pub fn new(context: &'c CodingContext) -> Self {
        Self::with_capacity(context, 0)
    }

    /// Create an encoder with room for `capacity` assignments
    pub fn with_capacity(context: &'c CodingContext, capacity: usize) -> Self {
        Self {
            context,
            assignments: Vec::with_capacity(capacity),
        }
    }

    /// The side-channel context
    pub fn context(&self) -> &CodingContext {
        self.context
    }

    /// Encode one field into a `name = value` assignment
    pub fn field<T: FieldType>(&mut self, name: &str, value: &T) -> Result<(), MappingError> {
        let field = value.to_field(self.context).map_err(|e| e.at(name))?;
        self.assignments.push(Assignment::new(name, field.into_column()));
        Ok(())
    }

    /// Append a pre-built assignment
    pub fn push(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Assignments emitted so far
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Finish and take the assignments
    pub fn finish(self) -> Vec<Assignment> {
        self.assignments
    }
}

/// Encode a record with an empty context
pub fn encode<R: Record>(record: &R) -> Result<Vec<Assignment>, MappingError> {
    encode_with(record, &CodingContext::new(), std::iter::empty())
}

/// Encode a record, then append `extra` assignments
///
/// Extra assignments come after the record's own, so at statement build
/// time they override record fields with the same column name.
pub fn encode_with<R, I>(
    record: &R,
    context: &CodingContext,
    extra: I,
) -> Result<Vec<Assignment>, MappingError>
where
    R: Record,
    I: IntoIterator<Item = Assignment>,
{
    let schema = R::schema()?;
    let mut encoder = RecordEncoder::with_capacity(context, schema.len());
    record.encode_fields(&mut encoder)?;
    let own = encoder.assignments.len();
    encoder.assignments.extend(extra);
    trace!(
        fields = own,
        extra = encoder.assignments.len() - own,
        "encoded record"
    );
    Ok(encoder.finish())
}

/// Encode several records, failing on the first error
pub fn encode_many<R: Record>(
    records: &[R],
    context: &CodingContext,
) -> Result<Vec<Vec<Assignment>>, MappingError> {
    records
        .iter()
        .map(|r| encode_with(r, context, std::iter::empty()))
        .collect()
}
