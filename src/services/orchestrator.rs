//! Batch orchestrator
//!
//! Owns the queue and drives the locator and restore executor across it.
//! The orchestrator is an explicitly constructed, caller-owned object; every
//! method takes `&self`, so it can be shared behind an `Arc` and driven from
//! a background thread while another thread polls it or cancels.
//!
//! Only one batch (`batch_scan` or `batch_restore`) runs at a time. The
//! queue lock is taken per step and never held across filesystem work or a
//! progress callback.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::progress::{BatchGuard, CancelHandle, ProgressCallback};
use crate::audit::{AuditEntry, AuditLogger, Outcome};
use crate::backup::{Disposer, RestoreExecutor};
use crate::config::{BakrPaths, Settings};
use crate::error::{BakrError, BakrResult};
use crate::locator::BackupLocator;
use crate::models::{BackupCandidate, EntryId, EntryStatus, QueueEntry};
use crate::queue::{Queue, QueueSnapshot, QueueSummary};

/// Outcome of one processed entry: whether it succeeded and its message
type StepOutcome = Option<(bool, String)>;

/// Coordinates scans and restores over a queue
pub struct BatchOrchestrator {
    queue: Mutex<Queue>,
    locator: BackupLocator,
    executor: RestoreExecutor,
    audit: Option<AuditLogger>,
    cancel: CancelHandle,
    progress: Mutex<Option<ProgressCallback>>,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new(BackupLocator::default(), RestoreExecutor::default())
    }
}

impl BatchOrchestrator {
    /// Create an orchestrator with an empty queue
    pub fn new(locator: BackupLocator, executor: RestoreExecutor) -> Self {
        Self {
            queue: Mutex::new(Queue::new()),
            locator,
            executor,
            audit: None,
            cancel: CancelHandle::new(),
            progress: Mutex::new(None),
        }
    }

    /// Create an orchestrator configured from settings, recording restores
    /// in the history log
    pub fn from_settings(settings: &Settings, paths: &BakrPaths) -> Self {
        let locator = BackupLocator::from_settings(&settings.search);
        let disposer = Disposer::new(settings.restore.dispose, paths.trash_dir());
        Self::new(locator, RestoreExecutor::new(disposer))
            .with_audit_log(AuditLogger::new(paths.history_log()))
    }

    /// Record every restore attempt in `logger`
    pub fn with_audit_log(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Start from an existing queue
    pub fn with_queue(mut self, queue: Queue) -> Self {
        self.queue = Mutex::new(queue);
        self
    }

    pub fn locator(&self) -> &BackupLocator {
        &self.locator
    }

    pub fn executor(&self) -> &RestoreExecutor {
        &self.executor
    }

    fn lock_queue(&self) -> BakrResult<MutexGuard<'_, Queue>> {
        self.queue
            .lock()
            .map_err(|_| BakrError::QueueUnavailable("queue lock poisoned".into()))
    }

    // --- Registration ---

    /// Register a file by name and size
    ///
    /// The id is derived from name, size and the current time. If that id is
    /// already queued the call is a no-op returning the existing id.
    pub fn add_entry(
        &self,
        name: &str,
        size: u64,
        path: Option<PathBuf>,
    ) -> BakrResult<EntryId> {
        let id = EntryId::derive(name, size, Utc::now().timestamp_millis());
        self.add_entry_with_id(id.clone(), name, size, path)?;
        Ok(id)
    }

    /// Register a file under a caller-supplied id
    ///
    /// Returns false, leaving the queue unchanged, if the id is taken.
    pub fn add_entry_with_id(
        &self,
        id: EntryId,
        name: &str,
        size: u64,
        path: Option<PathBuf>,
    ) -> BakrResult<bool> {
        let mut queue = self.lock_queue()?;
        let added = queue.insert(QueueEntry::new(id.clone(), name, size, path));
        if added {
            debug!(id = %id, "Added queue entry");
        } else {
            debug!(id = %id, "Ignored duplicate queue entry");
        }
        Ok(added)
    }

    /// Register an existing file, reading its name and size from disk
    ///
    /// The id uses the file's modification time, so adding the same
    /// unchanged file twice yields the same entry. A different file that
    /// derives the same id (same name, size and mtime elsewhere) gets the
    /// next free `_2`, `_3`, ... variant.
    pub fn add_file(&self, path: &Path) -> BakrResult<EntryId> {
        let path =
            fs::canonicalize(path).map_err(|_| BakrError::FileNotFound(path.to_path_buf()))?;
        let metadata =
            fs::metadata(&path).map_err(|_| BakrError::FileNotFound(path.clone()))?;
        if !metadata.is_file() {
            return Err(BakrError::Validation(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let name = file_name(&path);
        let modified = metadata
            .modified()
            .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
            .unwrap_or_else(|_| Utc::now().timestamp_millis());
        let base = EntryId::derive(&name, metadata.len(), modified);

        let mut queue = self.lock_queue()?;
        let id = (1u32..)
            .map(|n| base.numbered(n))
            .find(|id| {
                queue
                    .get(id)
                    .map_or(true, |e| e.path.as_deref() == Some(path.as_path()))
            })
            .unwrap_or_else(|| base.clone());

        if queue.get(&id).is_some() {
            debug!(id = %id, "File already queued");
        } else {
            queue.insert(QueueEntry::new(id.clone(), &name, metadata.len(), Some(path)));
            debug!(id = %id, "Added queue entry");
        }
        Ok(id)
    }

    /// Bind a path to an entry
    ///
    /// The file must exist and match the recorded name and size.
    pub fn set_path(&self, id: &EntryId, path: &Path) -> BakrResult<()> {
        let metadata =
            fs::metadata(path).map_err(|_| BakrError::FileNotFound(path.to_path_buf()))?;
        let actual_name = file_name(path);

        let mut queue = self.lock_queue()?;
        let entry = queue
            .get_mut(id)
            .ok_or_else(|| BakrError::entry_not_found(id.as_str()))?;

        if entry.status.is_busy() {
            return Err(BakrError::Validation(format!("{} is being processed", id)));
        }
        if actual_name != entry.name || metadata.len() != entry.size {
            return Err(BakrError::PathMismatch {
                expected_name: entry.name.clone(),
                expected_size: entry.size,
                actual_name,
                actual_size: metadata.len(),
            });
        }

        entry.bind_path(path.to_path_buf());
        Ok(())
    }

    /// Remove an entry; returns false if absent or a batch is running
    pub fn remove_entry(&self, id: &EntryId) -> BakrResult<bool> {
        if self.is_processing() {
            return Ok(false);
        }
        Ok(self.lock_queue()?.remove(id))
    }

    /// Remove every entry; returns false if a batch is running
    pub fn clear(&self) -> BakrResult<bool> {
        if self.is_processing() {
            return Ok(false);
        }
        self.lock_queue()?.clear();
        Ok(true)
    }

    /// Choose which discovered backup to restore from
    pub fn select_backup(&self, id: &EntryId, path: &Path) -> BakrResult<()> {
        let mut queue = self.lock_queue()?;
        queue
            .get_mut(id)
            .ok_or_else(|| BakrError::entry_not_found(id.as_str()))?
            .select_backup(path)
    }

    // --- Progress and cancellation ---

    /// Register the progress callback, replacing any previous one
    pub fn set_progress_callback<F>(&self, callback: F)
    where
        F: Fn(f64, &str) + Send + Sync + 'static,
    {
        if let Ok(mut slot) = self.progress.lock() {
            *slot = Some(Arc::new(callback));
        }
    }

    /// Remove the progress callback
    pub fn clear_progress_callback(&self) {
        if let Ok(mut slot) = self.progress.lock() {
            *slot = None;
        }
    }

    fn report(&self, progress: f64, message: &str) {
        let callback = self.progress.lock().ok().and_then(|slot| slot.clone());
        if let Some(callback) = callback {
            callback(progress, message);
        }
    }

    /// Ask the running batch to stop before its next entry
    pub fn cancel(&self) {
        if self.is_processing() {
            info!("Cancellation requested");
        }
        self.cancel.cancel();
    }

    /// Handle that cancels this orchestrator's batches from anywhere
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Check if a batch is in flight
    pub fn is_processing(&self) -> bool {
        self.cancel.is_processing()
    }

    // --- Scanning ---

    /// Scan one entry for a backup
    ///
    /// Returns false without scanning if the entry has no path or is being
    /// processed. Unlike `batch_scan`, no default backup is selected.
    pub fn scan_one(&self, id: &EntryId) -> BakrResult<bool> {
        match self.scan_entry(id)? {
            Some((found, message)) => {
                self.report(1.0, &message);
                Ok(found)
            }
            None => Ok(false),
        }
    }

    /// Scan every pending entry that has a path, in queue order
    ///
    /// Returns false without doing anything if no entry is eligible or a
    /// batch is already running, and false after a cancelled pass. Entries
    /// left with backups but no selection get their first candidate
    /// selected.
    pub fn batch_scan(&self) -> BakrResult<bool> {
        let Some(_guard) = BatchGuard::claim(&self.cancel) else {
            debug!("Batch scan rejected: a batch is already running");
            return Ok(false);
        };

        let ids: Vec<EntryId> = self
            .lock_queue()?
            .iter()
            .filter(|e| e.is_scannable())
            .map(|e| e.id.clone())
            .collect();
        if ids.is_empty() {
            debug!("Batch scan skipped: nothing to scan");
            return Ok(false);
        }

        info!(entries = ids.len(), "Batch scan started");

        let completed = self.run_batch(&ids, |id| self.scan_entry(id), "Cancelled before scan")?;

        let mut queue = self.lock_queue()?;
        let selected = queue
            .iter_mut()
            .map(|e| e.select_default_backup())
            .filter(|&made| made)
            .count();
        debug!(selected, "Selected default backups");

        info!(completed, "Batch scan finished");
        Ok(completed)
    }

    fn scan_entry(&self, id: &EntryId) -> BakrResult<StepOutcome> {
        let (path, name) = {
            let mut queue = self.lock_queue()?;
            let entry = queue
                .get_mut(id)
                .ok_or_else(|| BakrError::entry_not_found(id.as_str()))?;
            if entry.status.is_busy() {
                return Ok(None);
            }
            let Some(path) = entry.path.clone() else {
                return Ok(None);
            };
            entry.update_status(EntryStatus::Processing, "Scanning for backups");
            (path, entry.name.clone())
        };

        let (candidate, status, message) = match self.locator.locate(&path) {
            None => (
                None,
                EntryStatus::Error,
                format!("No backup found for {}", name),
            ),
            Some(found) => match BackupCandidate::from_path(&found) {
                Ok(candidate) => {
                    let message = format!("Found backup {} for {}", candidate.name, name);
                    (Some(candidate), EntryStatus::Completed, message)
                }
                Err(e) => (
                    None,
                    EntryStatus::Error,
                    format!("Could not read backup {}: {}", found.display(), e),
                ),
            },
        };

        let mut queue = self.lock_queue()?;
        let Some(entry) = queue.get_mut(id) else {
            return Ok(None);
        };
        if let Some(candidate) = candidate {
            entry.add_backup(candidate);
        }
        entry.update_status(status, message.clone());
        debug!(id = %id, status = %status, "Scanned entry");

        Ok(Some((status == EntryStatus::Completed, message)))
    }

    // --- Restoring ---

    /// Restore one entry from `backup_override`, or its selected backup
    ///
    /// Per-entry failures land on the entry as `Error` with a message and
    /// return false. Only an unknown id or an unusable queue is an `Err`.
    pub fn restore_one(&self, id: &EntryId, backup_override: Option<&Path>) -> BakrResult<bool> {
        match self.restore_entry(id, backup_override)? {
            Some((restored, message)) => {
                self.report(1.0, &message);
                Ok(restored)
            }
            None => Ok(false),
        }
    }

    /// Restore entries that have a selected backup, in queue order
    ///
    /// With `ids`, only those entries are considered, and ids whose selected
    /// backup is unset or gone from disk are skipped without touching their
    /// status. Returns false if nothing qualifies, a batch is already
    /// running, or the pass was cancelled.
    pub fn batch_restore(&self, ids: Option<&[EntryId]>) -> BakrResult<bool> {
        let Some(_guard) = BatchGuard::claim(&self.cancel) else {
            debug!("Batch restore rejected: a batch is already running");
            return Ok(false);
        };

        let targets: Vec<EntryId> = self
            .lock_queue()?
            .iter()
            .filter(|e| match ids {
                None => e.selected_backup.is_some(),
                Some(ids) => ids.contains(&e.id) && e.is_restorable(),
            })
            .map(|e| e.id.clone())
            .collect();
        if targets.is_empty() {
            debug!("Batch restore skipped: nothing to restore");
            return Ok(false);
        }

        info!(entries = targets.len(), "Batch restore started");

        let completed = self.run_batch(
            &targets,
            |id| self.restore_entry(id, None),
            "Cancelled before restore",
        )?;

        info!(completed, "Batch restore finished");
        Ok(completed)
    }

    fn restore_entry(&self, id: &EntryId, backup_override: Option<&Path>) -> BakrResult<StepOutcome> {
        let resolved = {
            let mut queue = self.lock_queue()?;
            let entry = queue
                .get_mut(id)
                .ok_or_else(|| BakrError::entry_not_found(id.as_str()))?;
            if entry.status.is_busy() {
                return Ok(None);
            }

            let requested = backup_override
                .map(Path::to_path_buf)
                .or_else(|| entry.selected_backup.clone());
            let backup = requested.clone().filter(|b| b.exists());

            match (entry.path.clone(), backup) {
                (None, _) => {
                    let message = format!("No file path set for {}", entry.name);
                    entry.update_status(EntryStatus::Error, message.clone());
                    Err(AuditEntry::rejected(
                        id,
                        Outcome::NoPath,
                        None,
                        requested.as_deref(),
                        message,
                    ))
                }
                (Some(target), None) => {
                    let message = BakrError::NoBackupAvailable(id.to_string()).to_string();
                    entry.update_status(EntryStatus::Error, message.clone());
                    Err(AuditEntry::rejected(
                        id,
                        Outcome::NoBackupAvailable,
                        Some(target.as_path()),
                        requested.as_deref(),
                        message,
                    ))
                }
                (Some(target), Some(backup)) => {
                    entry.update_status(
                        EntryStatus::Processing,
                        format!("Restoring from {}", backup.display()),
                    );
                    Ok((target, backup))
                }
            }
        };

        let (target, backup) = match resolved {
            Ok(paths) => paths,
            Err(rejected) => {
                self.record(&rejected);
                return Ok(Some((false, rejected.message)));
            }
        };

        let result = self.executor.restore(&target, &backup);
        self.record(&AuditEntry::from_result(Some(id), &result));

        let message = result.summary();
        let status = if result.success {
            EntryStatus::Completed
        } else {
            EntryStatus::Error
        };
        let consumed = result.success && !backup.exists();

        let mut queue = self.lock_queue()?;
        if let Some(entry) = queue.get_mut(id) {
            if consumed {
                entry.forget_backup(&backup);
            }
            entry.update_status(status, message.clone());
        }

        Ok(Some((result.success, message)))
    }

    fn record(&self, entry: &AuditEntry) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log(entry) {
                warn!(id = ?entry.entry_id, error = %e, "Could not record restore in history");
            }
        }
    }

    /// Process `ids` in order, reporting progress after each and honoring
    /// cancellation between entries
    ///
    /// Returns false if cancelled. Unreached entries still pending are
    /// marked cancelled.
    fn run_batch<F>(&self, ids: &[EntryId], mut step: F, cancel_message: &str) -> BakrResult<bool>
    where
        F: FnMut(&EntryId) -> BakrResult<StepOutcome>,
    {
        let total = ids.len();

        for (index, id) in ids.iter().enumerate() {
            if self.cancel.is_cancelled() {
                let cancelled = self.mark_cancelled(&ids[index..], cancel_message)?;
                info!(processed = index, cancelled, "Batch cancelled");
                return Ok(false);
            }

            let message = match step(id) {
                Ok(Some((_, message))) => message,
                Ok(None) | Err(BakrError::EntryNotFound(_)) => format!("Skipped {}", id),
                Err(e) => return Err(e),
            };
            self.report((index + 1) as f64 / total as f64, &message);
        }

        Ok(true)
    }

    fn mark_cancelled(&self, ids: &[EntryId], message: &str) -> BakrResult<usize> {
        let mut queue = self.lock_queue()?;
        let mut count = 0;
        for id in ids {
            if let Some(entry) = queue.get_mut(id) {
                if entry.status == EntryStatus::Pending {
                    entry.update_status(EntryStatus::Cancelled, message);
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    // --- Queries ---

    /// Copy of one entry
    pub fn entry(&self, id: &EntryId) -> BakrResult<Option<QueueEntry>> {
        Ok(self.lock_queue()?.get(id).cloned())
    }

    /// Copies of all entries in queue order
    pub fn entries(&self) -> BakrResult<Vec<QueueEntry>> {
        Ok(self.lock_queue()?.iter().cloned().collect())
    }

    /// Copies of entries in a status, in queue order
    pub fn entries_by_status(&self, status: EntryStatus) -> BakrResult<Vec<QueueEntry>> {
        Ok(self
            .lock_queue()?
            .by_status(status)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn len(&self) -> BakrResult<usize> {
        Ok(self.lock_queue()?.len())
    }

    pub fn is_empty(&self) -> BakrResult<bool> {
        Ok(self.lock_queue()?.is_empty())
    }

    /// Aggregate view of the queue
    pub fn summary(&self) -> BakrResult<QueueSummary> {
        let queue = self.lock_queue()?;
        Ok(QueueSummary::of(&queue, self.is_processing()))
    }

    // --- Snapshots ---

    /// Capture the queue
    pub fn snapshot(&self) -> BakrResult<QueueSnapshot> {
        let queue = self.lock_queue()?;
        Ok(QueueSnapshot::capture(&queue))
    }

    /// Replace the queue with a snapshot's entries
    pub fn load_snapshot(&self, snapshot: QueueSnapshot) -> BakrResult<()> {
        if self.is_processing() {
            return Err(BakrError::Validation(
                "Cannot load a snapshot while a batch is running".into(),
            ));
        }
        let queue = snapshot.into_queue()?;
        *self.lock_queue()? = queue;
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
