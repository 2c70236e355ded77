//! Encode/decode side-channel
//!
//! A [`CodingContext`] carries caller-supplied key/value data into every field
//! conversion of one encode or decode call. The bridge itself never reads it.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Out-of-band data visible to field conversions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodingContext {
    entries: BTreeMap<String, JsonValue>,
}

impl CodingContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Raw entry lookup
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    /// Typed entry lookup; `None` if missing or not deserializable as `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
