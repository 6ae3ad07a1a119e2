//! Restore executor
//!
//! Swaps a backup's content into a target file while keeping the displaced
//! original. The protocol, in order:
//!
//! 1. The backup must exist, otherwise nothing is touched.
//! 2. If the target exists it is copied to a preservation path
//!    (`<target>.new`, disambiguated when taken). If that copy fails the
//!    restore is aborted and the target is untouched.
//! 3. The backup is copied to a temporary sibling of the target and renamed
//!    over it, so a failed copy never leaves a half-written target.
//! 4. The consumed backup is disposed of. Failing to do so is logged and
//!    does not fail the restore.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::dispose::Disposer;
use super::preserve::{copy_with_metadata, preservation_path, staging_path};
use super::preview::{FileState, RestorePreview};
use crate::error::{BakrError, BakrResult};

/// Category of a failed restore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreFailure {
    /// Backup missing; nothing was touched
    NotFound,
    /// Preservation copy failed; target untouched
    PreserveFailed,
    /// Backup could not be copied onto the target
    CopyFailed,
}

impl RestoreFailure {
    fn of(err: &BakrError) -> Self {
        match err {
            BakrError::BackupNotFound(_) => Self::NotFound,
            BakrError::PreserveFailed { .. } => Self::PreserveFailed,
            _ => Self::CopyFailed,
        }
    }
}

/// Record of one restore attempt, successful or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreResult {
    pub success: bool,
    pub message: String,
    pub target_path: PathBuf,
    pub backup_path: PathBuf,
    /// Where the displaced target was copied, if it existed
    pub preserved_path: Option<PathBuf>,
    /// Where the consumed backup was moved, if it was
    #[serde(default)]
    pub disposed_path: Option<PathBuf>,
    #[serde(default)]
    pub failure: Option<RestoreFailure>,
    pub timestamp: DateTime<Utc>,
}

impl RestoreResult {
    fn started(target: &Path, backup: &Path) -> Self {
        Self {
            success: false,
            message: String::new(),
            target_path: target.to_path_buf(),
            backup_path: backup.to_path_buf(),
            preserved_path: None,
            disposed_path: None,
            failure: None,
            timestamp: Utc::now(),
        }
    }

    /// One-line description of the attempt
    pub fn summary(&self) -> String {
        match (&self.preserved_path, self.success) {
            (Some(preserved), true) => format!(
                "{} (previous version kept as {})",
                self.message,
                preserved.display()
            ),
            _ => self.message.clone(),
        }
    }
}

/// Performs restores
#[derive(Debug, Clone)]
pub struct RestoreExecutor {
    disposer: Disposer,
}

impl Default for RestoreExecutor {
    fn default() -> Self {
        Self::new(Disposer::keep())
    }
}

impl RestoreExecutor {
    /// Create an executor with a disposal policy
    pub fn new(disposer: Disposer) -> Self {
        Self { disposer }
    }

    /// Disposal policy in use
    pub fn disposer(&self) -> &Disposer {
        &self.disposer
    }

    /// Restore `backup` onto `target`
    ///
    /// Never fails outright: the outcome, including every path involved, is
    /// carried in the returned record.
    pub fn restore(&self, target: &Path, backup: &Path) -> RestoreResult {
        let mut result = RestoreResult::started(target, backup);

        match self.run(target, backup, &mut result) {
            Ok(()) => {
                result.success = true;
                result.message = format!(
                    "Restored {} to {}",
                    display_name(backup),
                    display_name(target)
                );
                info!(
                    file = %target.display(),
                    backup = %backup.display(),
                    "Restore succeeded"
                );
            }
            Err(err) => {
                result.failure = Some(RestoreFailure::of(&err));
                result.message = err.to_string();
                warn!(
                    file = %target.display(),
                    backup = %backup.display(),
                    error = %err,
                    "Restore failed"
                );
            }
        }

        result.timestamp = Utc::now();
        result
    }

    fn run(&self, target: &Path, backup: &Path, result: &mut RestoreResult) -> BakrResult<()> {
        if target == backup {
            return Err(BakrError::CopyFailed {
                target: target.to_path_buf(),
                reason: "backup and target are the same file".into(),
            });
        }

        if !backup.exists() {
            return Err(BakrError::BackupNotFound(backup.to_path_buf()));
        }

        if fs::symlink_metadata(target).is_ok() {
            let preserved = preservation_path(target, Local::now());
            if let Err(e) = copy_with_metadata(target, &preserved) {
                return Err(BakrError::PreserveFailed {
                    path: target.to_path_buf(),
                    reason: e.to_string(),
                });
            }
            debug!(preserved = %preserved.display(), "Created preservation copy");
            result.preserved_path = Some(preserved);
        }

        replace_atomically(backup, target)?;

        match self.disposer.dispose(backup) {
            Ok(Some(dest)) => {
                debug!(backup = %backup.display(), dest = %dest.display(), "Disposed of backup");
                result.disposed_path = Some(dest);
            }
            Ok(None) => {}
            Err(e) => warn!(
                backup = %backup.display(),
                error = %e,
                "Could not dispose of consumed backup"
            ),
        }

        Ok(())
    }

    /// Describe what `restore` would do without touching anything
    pub fn preview(&self, target: &Path, backup: &Path) -> RestorePreview {
        let target_state = FileState::probe(target);
        let backup_state = FileState::probe(backup);

        let preserved_path = if target_state.exists {
            Some(preservation_path(target, Local::now()))
        } else {
            None
        };
        let can_restore = backup_state.exists && target != backup;

        RestorePreview {
            will_preserve: preserved_path.is_some(),
            preserved_path,
            will_dispose: can_restore && self.disposer.moves_backups(),
            can_restore,
            target: target_state,
            backup: backup_state,
        }
    }
}

/// Copy `backup` to a temporary sibling of `target`, then rename it over
/// `target`
fn replace_atomically(backup: &Path, target: &Path) -> BakrResult<()> {
    let copy_failed = |reason: String| BakrError::CopyFailed {
        target: target.to_path_buf(),
        reason,
    };

    let temp_path = staging_path(target);

    // A leftover from an earlier run with the same pid
    let _ = fs::remove_file(&temp_path);
    if let Err(e) = copy_with_metadata(backup, &temp_path) {
        return Err(copy_failed(e.to_string()));
    }

    fs::rename(&temp_path, target).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        copy_failed(e.to_string())
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(target: Option<&str>, backup: Option<&str>) -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let target_path = temp.path().join("notes.txt");
        let backup_path = temp.path().join("notes.txt.bak");
        if let Some(content) = target {
            fs::write(&target_path, content).unwrap();
        }
        if let Some(content) = backup {
            fs::write(&backup_path, content).unwrap();
        }
        (temp, target_path, backup_path)
    }

    #[test]
    fn test_restore_preserves_and_overwrites() {
        let (_temp, target, backup) = setup(Some("new"), Some("old"));

        let result = RestoreExecutor::default().restore(&target, &backup);

        assert!(result.success, "{}", result.message);
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
        let preserved = result.preserved_path.clone().unwrap();
        assert_eq!(preserved, target.with_file_name("notes.txt.new"));
        assert_eq!(fs::read_to_string(preserved).unwrap(), "new");
        assert!(result.failure.is_none());
        assert!(result.summary().contains("previous version kept"));
    }

    #[test]
    fn test_restore_twice_keeps_both_preservation_copies() {
        let (_temp, target, backup) = setup(Some("v1"), Some("v0"));
        let executor = RestoreExecutor::default();

        let first = executor.restore(&target, &backup);
        fs::write(&target, "v2").unwrap();
        let second = executor.restore(&target, &backup);

        assert!(first.success && second.success);
        let p1 = first.preserved_path.unwrap();
        let p2 = second.preserved_path.unwrap();
        assert_ne!(p1, p2);
        assert_eq!(fs::read_to_string(&p1).unwrap(), "v1");
        assert_eq!(fs::read_to_string(&p2).unwrap(), "v2");
        assert!(p2
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("notes.txt.new."));
    }

    #[test]
    fn test_missing_backup_touches_nothing() {
        let (temp, target, backup) = setup(Some("current"), None);

        let result = RestoreExecutor::default().restore(&target, &backup);

        assert!(!result.success);
        assert_eq!(result.failure, Some(RestoreFailure::NotFound));
        assert_eq!(result.backup_path, backup);
        assert!(result.preserved_path.is_none());
        assert_eq!(fs::read_to_string(&target).unwrap(), "current");
        assert!(!temp.path().join("notes.txt.new").exists());
    }

    #[test]
    fn test_absent_target_is_created() {
        let (_temp, target, backup) = setup(None, Some("old"));

        let result = RestoreExecutor::default().restore(&target, &backup);

        assert!(result.success);
        assert!(result.preserved_path.is_none());
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
    }

    #[test]
    fn test_preserve_failure_aborts() {
        let temp = TempDir::new().unwrap();
        // A directory target cannot be copied as a file
        let target = temp.path().join("folder");
        fs::create_dir(&target).unwrap();
        let backup = temp.path().join("folder.bak");
        fs::write(&backup, "old").unwrap();

        let result = RestoreExecutor::default().restore(&target, &backup);

        assert!(!result.success);
        assert_eq!(result.failure, Some(RestoreFailure::PreserveFailed));
        assert!(target.is_dir());
        assert!(backup.exists());
        assert!(!temp.path().join("folder.new").exists());
    }

    #[test]
    fn test_same_path_rejected() {
        let (_temp, target, _backup) = setup(Some("x"), None);

        let result = RestoreExecutor::default().restore(&target, &target);
        assert_eq!(result.failure, Some(RestoreFailure::CopyFailed));
        assert_eq!(fs::read_to_string(&target).unwrap(), "x");
    }

    #[test]
    fn test_trash_disposal() {
        let (temp, target, backup) = setup(Some("new"), Some("old"));
        let executor = RestoreExecutor::new(Disposer::trash(temp.path().join("trash")));

        let result = executor.restore(&target, &backup);

        assert!(result.success);
        assert!(!backup.exists());
        let disposed = result.disposed_path.unwrap();
        assert_eq!(fs::read_to_string(disposed).unwrap(), "old");
    }

    #[test]
    fn test_copy_failure_leaves_target_intact() {
        let (temp, target, backup) = setup(Some("new"), Some("old"));
        // Occupy the temporary sibling so the copy cannot be staged
        let staging = temp
            .path()
            .join(format!(".notes.txt.bakr-tmp-{}", std::process::id()));
        fs::create_dir(&staging).unwrap();

        let result = RestoreExecutor::default().restore(&target, &backup);

        assert!(!result.success);
        assert_eq!(result.failure, Some(RestoreFailure::CopyFailed));
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old");
        let preserved = result.preserved_path.unwrap();
        assert_eq!(fs::read_to_string(preserved).unwrap(), "new");
        assert!(staging.is_dir());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (temp, target, backup) = setup(Some("new"), Some("old"));
        RestoreExecutor::default().restore(&target, &backup);

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("bakr-tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_preview_is_read_only() {
        let (temp, target, backup) = setup(Some("new"), Some("older"));
        let executor = RestoreExecutor::new(Disposer::trash(temp.path().join("trash")));

        let preview = executor.preview(&target, &backup);

        assert!(preview.can_restore);
        assert!(preview.will_preserve);
        assert!(preview.will_dispose);
        assert_eq!(preview.target.size, 3);
        assert_eq!(preview.backup.size, 5);
        assert_eq!(
            preview.preserved_path,
            Some(temp.path().join("notes.txt.new"))
        );
        assert!(!temp.path().join("notes.txt.new").exists());
        assert!(!temp.path().join("trash").exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_preview_without_backup() {
        let (_temp, target, backup) = setup(None, None);
        let preview = RestoreExecutor::default().preview(&target, &backup);

        assert!(!preview.can_restore);
        assert!(!preview.will_preserve);
        assert!(preview.preserved_path.is_none());
        assert!(preview.backup.modified.is_none());
    }
}
