//! Backup candidate model
//!
//! A file discovered by the locator as a possible prior version of a target.
//! The candidate only references the file; it never owns it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::format_size;

/// Similarity assigned to every candidate. No content comparison is
/// performed; the value only keeps the field's range meaningful.
pub const PLACEHOLDER_SIMILARITY: f64 = 1.0;

/// A discovered backup file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupCandidate {
    /// Absolute path of the backup file
    pub path: PathBuf,

    /// File name of the backup
    pub name: String,

    /// Size in bytes
    pub size: u64,

    /// Last modification time of the backup file
    pub modified_time: DateTime<Utc>,

    /// Normalized score in [0, 1]
    pub similarity: f64,

    /// Extension including the leading dot (e.g. ".bak")
    pub kind: String,
}

impl BackupCandidate {
    /// Build a candidate by reading the file's metadata
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified_time = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size: metadata.len(),
            modified_time,
            similarity: PLACEHOLDER_SIMILARITY,
            kind: path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default(),
        })
    }

    /// Human-readable size
    pub fn size_display(&self) -> String {
        format_size(self.size)
    }
}
