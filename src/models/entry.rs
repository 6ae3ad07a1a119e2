//! Queue entry model
//!
//! One target file plus its discovered backup candidates and current status.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::BackupCandidate;
use super::ids::EntryId;
use super::status::EntryStatus;
use crate::error::{BakrError, BakrResult};

/// A unit of work in the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Unique identifier within the queue
    pub id: EntryId,

    /// File name of the target
    pub name: String,

    /// Path of the target, unset while awaiting one
    pub path: Option<PathBuf>,

    /// Recorded size of the target in bytes
    pub size: u64,

    /// Current status
    #[serde(default)]
    pub status: EntryStatus,

    /// Result of the last status transition
    #[serde(default)]
    pub message: String,

    /// Discovered backups, in discovery order
    #[serde(default)]
    pub backups: Vec<BackupCandidate>,

    /// Backup chosen for restore; always one of `backups`
    #[serde(default)]
    pub selected_backup: Option<PathBuf>,

    /// When the entry was registered
    pub added_at: DateTime<Utc>,

    /// When the entry was last mutated
    pub last_modified_at: DateTime<Utc>,
}

impl QueueEntry {
    /// Create a new pending entry
    pub fn new(id: EntryId, name: impl Into<String>, size: u64, path: Option<PathBuf>) -> Self {
        let now = Utc::now();
        let message = if path.is_some() {
            "Waiting to be scanned"
        } else {
            "Waiting for a file path"
        };

        Self {
            id,
            name: name.into(),
            path,
            size,
            status: EntryStatus::Pending,
            message: message.to_string(),
            backups: Vec::new(),
            selected_backup: None,
            added_at: now,
            last_modified_at: now,
        }
    }

    /// Transition to a new status, overwriting the message
    pub fn update_status(&mut self, status: EntryStatus, message: impl Into<String>) {
        self.status = status;
        self.message = message.into();
        self.touch();
    }

    /// Bind a path, returning the entry to pending
    pub fn bind_path(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.update_status(EntryStatus::Pending, "Path set, waiting to be scanned");
    }

    /// Append a discovered backup
    ///
    /// Returns false if a candidate with the same path is already recorded.
    pub fn add_backup(&mut self, candidate: BackupCandidate) -> bool {
        if self.has_backup(&candidate.path) {
            return false;
        }
        self.backups.push(candidate);
        self.touch();
        true
    }

    /// Check if a path is among the discovered backups
    pub fn has_backup(&self, path: &Path) -> bool {
        self.backups.iter().any(|b| b.path == path)
    }

    /// Select one of the discovered backups for restore
    pub fn select_backup(&mut self, path: &Path) -> BakrResult<()> {
        if !self.has_backup(path) {
            return Err(BakrError::Validation(format!(
                "{} is not a discovered backup of {}",
                path.display(),
                self.name
            )));
        }
        self.selected_backup = Some(path.to_path_buf());
        self.touch();
        Ok(())
    }

    /// Select the first discovered backup if nothing is selected yet
    ///
    /// Returns true if a selection was made.
    pub fn select_default_backup(&mut self) -> bool {
        if self.selected_backup.is_some() {
            return false;
        }
        match self.backups.first().map(|b| b.path.clone()) {
            Some(path) => {
                self.selected_backup = Some(path);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// The currently selected candidate
    pub fn selected_candidate(&self) -> Option<&BackupCandidate> {
        let selected = self.selected_backup.as_ref()?;
        self.backups.iter().find(|b| &b.path == selected)
    }

    /// Check if the entry has at least one discovered backup
    pub fn has_backups(&self) -> bool {
        !self.backups.is_empty()
    }

    /// Check if the selected backup can be restored from without an
    /// override; probes the filesystem
    pub fn is_restorable(&self) -> bool {
        self.selected_backup.as_deref().is_some_and(Path::exists)
    }

    /// Drop a backup that no longer exists at `path`, clearing the
    /// selection if it pointed there
    ///
    /// Returns true if anything was removed.
    pub fn forget_backup(&mut self, path: &Path) -> bool {
        let before = self.backups.len();
        self.backups.retain(|b| b.path != path);
        let unselected = self.selected_backup.as_deref() == Some(path);
        if unselected {
            self.selected_backup = None;
        }

        let changed = unselected || self.backups.len() != before;
        if changed {
            self.touch();
        }
        changed
    }

    /// Check if the entry can be picked up by a batch scan
    pub fn is_scannable(&self) -> bool {
        self.status == EntryStatus::Pending && self.path.is_some()
    }

    /// Check the `selected_backup ∈ backups` invariant
    pub fn selection_is_consistent(&self) -> bool {
        match &self.selected_backup {
            Some(path) => self.has_backup(path),
            None => true,
        }
    }

    fn touch(&mut self) {
        self.last_modified_at = Utc::now();
    }
}
