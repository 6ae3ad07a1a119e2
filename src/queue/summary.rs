//! Queue summary

use std::collections::BTreeMap;

use serde::Serialize;

use super::Queue;
use crate::models::EntryStatus;

/// Aggregate view of a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSummary {
    pub total_files: usize,
    pub total_size: u64,
    pub counts_by_status: BTreeMap<EntryStatus, usize>,
    pub is_processing: bool,
    pub items_with_backups: usize,
    pub restorable_items: usize,
}

impl QueueSummary {
    /// Summarize a queue
    pub fn of(queue: &Queue, is_processing: bool) -> Self {
        Self {
            total_files: queue.len(),
            total_size: queue.total_size(),
            counts_by_status: queue.counts_by_status(),
            is_processing,
            items_with_backups: queue.with_backups().len(),
            restorable_items: queue.restorable().len(),
        }
    }

    /// Number of entries in a status
    pub fn count(&self, status: EntryStatus) -> usize {
        self.counts_by_status.get(&status).copied().unwrap_or(0)
    }
}
