//! Queue snapshots
//!
//! A structured record of every entry, sufficient to rebuild the queue
//! verbatim. Persisted by `storage::QueueStore` and `export`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Queue;
use crate::error::{BakrError, BakrResult};
use crate::models::QueueEntry;

/// Current snapshot schema version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Serializable state of a queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Schema version for compatibility checking
    pub schema_version: u32,

    /// When the snapshot was taken
    pub exported_at: DateTime<Utc>,

    /// Entries in queue order
    #[serde(default)]
    pub entries: Vec<QueueEntry>,
}

impl Default for QueueSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            entries: Vec::new(),
        }
    }
}

impl QueueSnapshot {
    /// Capture the current state of a queue
    pub fn capture(queue: &Queue) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            entries: queue.iter().cloned().collect(),
        }
    }

    /// Check the snapshot can be loaded
    pub fn validate(&self) -> BakrResult<()> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(BakrError::Validation(format!(
                "Snapshot schema version {} is newer than supported version {}",
                self.schema_version, SNAPSHOT_SCHEMA_VERSION
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &self.entries {
            if !seen.insert(&entry.id) {
                return Err(BakrError::Validation(format!(
                    "Duplicate entry id in snapshot: {}",
                    entry.id
                )));
            }
            if !entry.selection_is_consistent() {
                return Err(BakrError::Validation(format!(
                    "Entry {} selects a backup it never discovered",
                    entry.id
                )));
            }
        }

        Ok(())
    }

    /// Rebuild the queue
    pub fn into_queue(self) -> BakrResult<Queue> {
        self.validate()?;
        Ok(Queue::from_entries(self.entries))
    }
}
