//! Restore previews
//!
//! What a restore would do, computed from metadata alone.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Observed state of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileState {
    pub path: PathBuf,
    pub exists: bool,
    /// Size in bytes, 0 when absent
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl FileState {
    /// Stat `path` without modifying it
    pub fn probe(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(metadata) => Self {
                path: path.to_path_buf(),
                exists: true,
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            },
            Err(_) => Self {
                path: path.to_path_buf(),
                exists: false,
                size: 0,
                modified: None,
            },
        }
    }
}

/// Result of `RestoreExecutor::preview`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestorePreview {
    pub target: FileState,
    pub backup: FileState,
    /// Preservation copy that would be created
    pub preserved_path: Option<PathBuf>,
    pub will_preserve: bool,
    /// Whether the backup would be moved to the trash afterwards
    pub will_dispose: bool,
    pub can_restore: bool,
}
