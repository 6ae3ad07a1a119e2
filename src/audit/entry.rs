//! Audit entry data structures
//!
//! One entry per restore attempt, successful or not.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backup::{RestoreFailure, RestoreResult};
use crate::models::EntryId;

/// Outcome recorded for an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Restored,
    NotFound,
    PreserveFailed,
    CopyFailed,
    /// Nothing to restore from; the executor was not called
    NoBackupAvailable,
    /// The queue entry had no target path
    NoPath,
}

impl Outcome {
    fn of(result: &RestoreResult) -> Self {
        match result.failure {
            None => Outcome::Restored,
            Some(RestoreFailure::NotFound) => Outcome::NotFound,
            Some(RestoreFailure::PreserveFailed) => Outcome::PreserveFailed,
            Some(RestoreFailure::CopyFailed) => Outcome::CopyFailed,
        }
    }

    /// Check if the attempt restored the target
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Restored)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Restored => write!(f, "RESTORED"),
            Outcome::NotFound => write!(f, "NOT_FOUND"),
            Outcome::PreserveFailed => write!(f, "PRESERVE_FAILED"),
            Outcome::CopyFailed => write!(f, "COPY_FAILED"),
            Outcome::NoBackupAvailable => write!(f, "NO_BACKUP"),
            Outcome::NoPath => write!(f, "NO_PATH"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the attempt finished (UTC)
    pub timestamp: DateTime<Utc>,

    pub outcome: Outcome,

    /// Queue entry the attempt belonged to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<EntryId>,

    /// Empty when the entry had no path
    #[serde(default)]
    pub target: PathBuf,

    /// Empty when there was no backup to try
    #[serde(default)]
    pub backup: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserved: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposed: Option<PathBuf>,

    pub message: String,
}

impl AuditEntry {
    /// Build an entry from a restore result
    pub fn from_result(entry_id: Option<&EntryId>, result: &RestoreResult) -> Self {
        Self {
            timestamp: result.timestamp,
            outcome: Outcome::of(result),
            entry_id: entry_id.cloned(),
            target: result.target_path.clone(),
            backup: result.backup_path.clone(),
            preserved: result.preserved_path.clone(),
            disposed: result.disposed_path.clone(),
            message: result.message.clone(),
        }
    }

    /// Build an entry for an attempt turned away before any file was
    /// touched
    pub fn rejected(
        entry_id: &EntryId,
        outcome: Outcome,
        target: Option<&Path>,
        backup: Option<&Path>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            outcome,
            entry_id: Some(entry_id.clone()),
            target: target.map(Path::to_path_buf).unwrap_or_default(),
            backup: backup.map(Path::to_path_buf).unwrap_or_default(),
            preserved: None,
            disposed: None,
            message: message.into(),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} <- {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.outcome,
            path_or_dash(&self.target),
            path_or_dash(&self.backup)
        );

        if let Some(id) = &self.entry_id {
            output.push_str(&format!(" ({})", id));
        }

        if let Some(preserved) = &self.preserved {
            output.push_str(&format!("\n  Preserved: {}", preserved.display()));
        }

        if !self.outcome.is_success() {
            output.push_str(&format!("\n  Reason: {}", self.message));
        }

        output
    }
}

fn path_or_dash(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "-".to_string()
    } else {
        path.display().to_string()
    }
}
