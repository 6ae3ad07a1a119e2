//! Persisted queue
//!
//! The CLI keeps its queue between invocations as a snapshot in
//! `queue.json`. Saves are staged in a hidden sibling and renamed into
//! place, so the file is either the old snapshot or the new one.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backup::preserve::staging_path;
use crate::config::BakrPaths;
use crate::error::{BakrError, BakrResult};
use crate::queue::QueueSnapshot;

/// Loads and saves the queue snapshot file
#[derive(Debug, Clone)]
pub struct QueueStore {
    path: PathBuf,
}

impl QueueStore {
    /// Store at an explicit path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the configured queue file
    pub fn from_paths(paths: &BakrPaths) -> Self {
        Self::new(paths.queue_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot; a missing file is an empty queue
    ///
    /// A file that does not parse or fails validation is an error and is
    /// left as it is.
    pub fn load(&self) -> BakrResult<QueueSnapshot> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved queue");
                return Ok(QueueSnapshot::default());
            }
            Err(e) => {
                return Err(BakrError::Storage(format!(
                    "Could not read queue file {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let snapshot: QueueSnapshot = serde_json::from_str(&text).map_err(|e| {
            BakrError::Storage(format!(
                "Queue file {} is not a valid snapshot: {}",
                self.path.display(),
                e
            ))
        })?;
        snapshot.validate()?;

        debug!(entries = snapshot.entries.len(), path = %self.path.display(), "Loaded queue");
        Ok(snapshot)
    }

    /// Save the snapshot atomically
    pub fn save(&self, snapshot: &QueueSnapshot) -> BakrResult<()> {
        let data = serde_json::to_vec_pretty(snapshot)?;
        let saving_failed = |e: io::Error| {
            BakrError::Storage(format!(
                "Could not save queue to {}: {}",
                self.path.display(),
                e
            ))
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(saving_failed)?;
        }

        let staged = staging_path(&self.path);
        let _ = fs::remove_file(&staged);
        let written = write_synced(&staged, &data).and_then(|()| fs::rename(&staged, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&staged);
            return Err(saving_failed(e));
        }

        debug!(entries = snapshot.entries.len(), path = %self.path.display(), "Saved queue");
        Ok(())
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryId, QueueEntry};
    use crate::queue::Queue;
    use tempfile::TempDir;

    fn snapshot_of(ids: &[&str]) -> QueueSnapshot {
        let mut queue = Queue::new();
        for id in ids {
            queue.insert(QueueEntry::new(EntryId::from(*id), "a", 1, None));
        }
        QueueSnapshot::capture(&queue)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = QueueStore::new(temp.path().join("queue.json"));
        assert!(store.load().unwrap().entries.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let paths = BakrPaths::with_base_dir(temp.path().join("nested"));
        let store = QueueStore::from_paths(&paths);
        let snapshot = snapshot_of(&["a_1_1"]);

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), snapshot);
        assert_eq!(store.path(), paths.queue_file());
        assert!(!staging_path(store.path()).exists());
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let temp = TempDir::new().unwrap();
        let store = QueueStore::new(temp.path().join("queue.json"));

        store.save(&snapshot_of(&["a_1_1", "b_1_1"])).unwrap();
        store.save(&snapshot_of(&["c_1_1"])).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].id, EntryId::from("c_1_1"));
    }

    #[test]
    fn test_save_ignores_stale_staging_file() {
        let temp = TempDir::new().unwrap();
        let store = QueueStore::new(temp.path().join("queue.json"));
        fs::write(staging_path(store.path()), "half a snapshot").unwrap();

        store.save(&snapshot_of(&["a_1_1"])).unwrap();
        assert_eq!(store.load().unwrap().entries.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("queue.json");
        fs::write(&path, "{ not json").unwrap();

        let err = QueueStore::new(path.clone()).load().unwrap_err();
        assert!(matches!(err, BakrError::Storage(_)));
        assert!(err.to_string().contains("not a valid snapshot"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
