//! Disposal of consumed backups
//!
//! After a successful restore the backup file has served its purpose. In
//! trash mode it is moved into bakr's trash directory under a timestamped
//! name so it can still be recovered by hand. System mode hands it to the
//! operating system's trash. Keep mode leaves it alone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use super::preserve::copy_with_metadata;
use crate::config::settings::DisposeMode;

/// Moves consumed backups out of the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disposer {
    mode: DisposeMode,
    trash_dir: PathBuf,
}

impl Disposer {
    /// Create a disposer that moves backups into `trash_dir`
    pub fn trash(trash_dir: PathBuf) -> Self {
        Self {
            mode: DisposeMode::Trash,
            trash_dir,
        }
    }

    /// Create a disposer that leaves backups in place
    pub fn keep() -> Self {
        Self {
            mode: DisposeMode::Keep,
            trash_dir: PathBuf::new(),
        }
    }

    /// Create a disposer that uses the operating system's trash
    pub fn system() -> Self {
        Self {
            mode: DisposeMode::System,
            trash_dir: PathBuf::new(),
        }
    }

    /// Create a disposer for a configured mode
    pub fn new(mode: DisposeMode, trash_dir: PathBuf) -> Self {
        match mode {
            DisposeMode::Trash => Self::trash(trash_dir),
            DisposeMode::System => Self::system(),
            DisposeMode::Keep => Self::keep(),
        }
    }

    /// Configured mode
    pub fn mode(&self) -> DisposeMode {
        self.mode
    }

    /// Check if disposal would move the backup
    pub fn moves_backups(&self) -> bool {
        self.mode != DisposeMode::Keep
    }

    /// Dispose of `backup`, returning where it went when that is known
    ///
    /// The system trash does not report a location, so it yields `None`
    /// like keep mode; the backup is gone from its path either way.
    pub fn dispose(&self, backup: &Path) -> io::Result<Option<PathBuf>> {
        match self.mode {
            DisposeMode::Keep => Ok(None),
            DisposeMode::System => {
                trash::delete(backup)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
                debug!(backup = %backup.display(), "Moved backup to the system trash");
                Ok(None)
            }
            DisposeMode::Trash => self.move_to_trash_dir(backup).map(Some),
        }
    }

    fn move_to_trash_dir(&self, backup: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.trash_dir)?;
        let dest = self.trash_path_for(backup);

        if fs::rename(backup, &dest).is_err() {
            // Rename fails across filesystems
            copy_with_metadata(backup, &dest)?;
            if let Err(e) = fs::remove_file(backup) {
                let _ = fs::remove_file(&dest);
                return Err(e);
            }
        }

        Ok(dest)
    }

    fn trash_path_for(&self, backup: &Path) -> PathBuf {
        let now = Utc::now();
        let name = backup
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "backup".to_string());
        let stem = format!(
            "{}-{:03}-{}",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis(),
            name
        );

        let first = self.trash_dir.join(&stem);
        if fs::symlink_metadata(&first).is_err() {
            return first;
        }
        (1u32..)
            .map(|n| self.trash_dir.join(format!("{}.{}", stem, n)))
            .find(|p| fs::symlink_metadata(p).is_err())
            .unwrap_or(first)
    }
}
