//! Convenient imports for rowmap.
//!
//! ```ignore
//! use rowmap::prelude::*;
//!
//! let db = Database::open_in_memory()?;
//! ```

// Main entry point
pub use crate::database::{Database, DatabaseBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Declaration macros
pub use crate::{json_field, raw_field, record};

// Record bridge
pub use rowmap_codec::{Record, RowReader, ValueRow};
pub use rowmap_core::{
    Assignment, CodingContext, ColumnValue, Json, MappingError, RawKind, RawRepresentable,
    RawValue,
};

// Keys
pub use rowmap_security::{KeyMaterial, KeyOptions, KeyState};

// Re-export serde_json for convenience
pub use serde_json::json;
