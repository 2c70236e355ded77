//! Temporal storage transforms
//!
//! Temporal values are stored as text in the engine's native convention:
//!
//! | Kind | Stored as |
//! |------|-----------|
//! | Timestamp (`DateTime<Utc>`) | `YYYY-MM-DDTHH:MM:SS.sss` (UTC) |
//! | DateTime (`NaiveDateTime`) | `YYYY-MM-DDTHH:MM:SS.sss` |
//! | Date (`NaiveDate`) | `YYYY-MM-DD` |
//!
//! Precision is milliseconds; anything finer is truncated on write.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Text format for timestamps and naive date-times
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Text format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which temporal type a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    /// UTC instant
    Timestamp,
    /// Date and time without zone
    DateTime,
    /// Calendar date
    Date,
}

/// A temporal value in transit between a field and its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalValue {
    /// UTC instant
    Timestamp(DateTime<Utc>),
    /// Date and time without zone
    DateTime(NaiveDateTime),
    /// Calendar date
    Date(NaiveDate),
}

impl TemporalValue {
    /// The kind of this value
    pub fn kind(&self) -> TemporalKind {
        match self {
            TemporalValue::Timestamp(_) => TemporalKind::Timestamp,
            TemporalValue::DateTime(_) => TemporalKind::DateTime,
            TemporalValue::Date(_) => TemporalKind::Date,
        }
    }

    /// Render to the stored text form
    pub fn to_storage(&self) -> String {
        match self {
            TemporalValue::Timestamp(ts) => ts.naive_utc().format(DATETIME_FORMAT).to_string(),
            TemporalValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            TemporalValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }

    /// Parse the stored text form for the given kind
    pub fn from_storage(kind: TemporalKind, text: &str) -> Result<Self, chrono::ParseError> {
        match kind {
            TemporalKind::Timestamp => {
                let naive = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)?;
                Ok(TemporalValue::Timestamp(naive.and_utc()))
            }
            TemporalKind::DateTime => {
                NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map(TemporalValue::DateTime)
            }
            TemporalKind::Date => {
                NaiveDate::parse_from_str(text, DATE_FORMAT).map(TemporalValue::Date)
            }
        }
    }
}
