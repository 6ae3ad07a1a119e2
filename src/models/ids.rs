//! Queue entry identifiers
//!
//! Entry ids are plain strings so callers can supply their own, but the
//! newtype keeps them from being confused with paths or names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a queue entry, unique within one queue
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Wrap a caller-supplied id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an id from file metadata: `<name>_<size>_<timestamp millis>`
    pub fn derive(name: &str, size: u64, timestamp_millis: i64) -> Self {
        Self(format!("{}_{}_{}", name, size, timestamp_millis))
    }

    /// The `n`th id in a collision sequence: this id for 1, `<id>_<n>` after
    pub fn numbered(&self, n: u32) -> Self {
        if n <= 1 {
            self.clone()
        } else {
            Self(format!("{}_{}", self.0, n))
        }
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive() {
        let id = EntryId::derive("notes.txt", 42, 1_700_000_000_123);
        assert_eq!(id.as_str(), "notes.txt_42_1700000000123");
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let id = EntryId::new("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(EntryId::from("x_1_2").to_string(), "x_1_2");
    }

    #[test]
    fn test_numbered() {
        let id = EntryId::derive("f.txt", 2, 5);
        assert_eq!(id.numbered(1), id);
        assert_eq!(id.numbered(2).as_str(), "f.txt_2_5_2");
    }
}
