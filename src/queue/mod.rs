//! The file queue
//!
//! An ordered collection of [`QueueEntry`] keyed by id. Insertion order is
//! the processing and reporting order; duplicate ids are rejected.

mod snapshot;
mod summary;

pub use snapshot::{QueueSnapshot, SNAPSHOT_SCHEMA_VERSION};
pub use summary::QueueSummary;

use std::collections::BTreeMap;

use crate::models::{EntryId, EntryStatus, QueueEntry};

/// Ordered queue of entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    entries: Vec<QueueEntry>,
}

impl Queue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue from entries, dropping later duplicates of an id
    pub fn from_entries(entries: Vec<QueueEntry>) -> Self {
        let mut queue = Self::new();
        for entry in entries {
            queue.insert(entry);
        }
        queue
    }

    /// Append an entry; returns false if its id is already present
    pub fn insert(&mut self, entry: QueueEntry) -> bool {
        if self.contains(&entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Check if an id is present
    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    /// Look up an entry
    pub fn get(&self, id: &EntryId) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Look up an entry for mutation
    pub fn get_mut(&mut self, id: &EntryId) -> Option<&mut QueueEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    /// Remove an entry; returns false if the id is unknown
    pub fn remove(&mut self, id: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        self.entries.len() < before
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    /// Iterate entries mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut QueueEntry> {
        self.entries.iter_mut()
    }

    /// Entry ids in insertion order
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with the given status
    pub fn by_status(&self, status: EntryStatus) -> Vec<&QueueEntry> {
        self.entries.iter().filter(|e| e.status == status).collect()
    }

    /// Entries with at least one discovered backup
    pub fn with_backups(&self) -> Vec<&QueueEntry> {
        self.entries.iter().filter(|e| e.has_backups()).collect()
    }

    /// Entries whose selected backup still exists
    pub fn restorable(&self) -> Vec<&QueueEntry> {
        self.entries.iter().filter(|e| e.is_restorable()).collect()
    }

    /// Sum of recorded entry sizes
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    /// Count of entries per status; every status is present
    pub fn counts_by_status(&self) -> BTreeMap<EntryStatus, usize> {
        let mut counts: BTreeMap<EntryStatus, usize> =
            EntryStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for entry in &self.entries {
            *counts.entry(entry.status).or_insert(0) += 1;
        }
        counts
    }

    /// Consume the queue into its entries
    pub fn into_entries(self) -> Vec<QueueEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, size: u64) -> QueueEntry {
        QueueEntry::new(EntryId::new(id), format!("{}.txt", id), size, None)
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut queue = Queue::new();
        assert!(queue.insert(entry("a", 1)));
        assert!(!queue.insert(entry("a", 99)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get(&EntryId::new("a")).unwrap().size, 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut queue = Queue::new();
        for id in ["c", "a", "b"] {
            queue.insert(entry(id, 1));
        }
        let ids: Vec<String> = queue.ids().into_iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        queue.remove(&EntryId::new("a"));
        let ids: Vec<String> = queue.ids().into_iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut queue = Queue::new();
        queue.insert(entry("a", 1));
        queue.insert(entry("b", 2));

        assert!(queue.remove(&EntryId::new("a")));
        assert!(!queue.remove(&EntryId::new("a")));
        assert_eq!(queue.len(), 1);

        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_counts_and_size() {
        let mut queue = Queue::new();
        queue.insert(entry("a", 10));
        queue.insert(entry("b", 20));
        queue
            .get_mut(&EntryId::new("b"))
            .unwrap()
            .update_status(EntryStatus::Error, "no backup");

        let counts = queue.counts_by_status();
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[&EntryStatus::Pending], 1);
        assert_eq!(counts[&EntryStatus::Error], 1);
        assert_eq!(counts[&EntryStatus::Cancelled], 0);
        assert_eq!(queue.total_size(), 30);
        assert_eq!(queue.by_status(EntryStatus::Error).len(), 1);
    }

    #[test]
    fn test_from_entries_drops_duplicates() {
        let queue = Queue::from_entries(vec![entry("a", 1), entry("a", 2), entry("b", 3)]);
        assert_eq!(queue.len(), 2);
    }
}
