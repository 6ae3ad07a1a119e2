//! Custom error types for bakr
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for bakr operations
#[derive(Error, Debug)]
pub enum BakrError {
    /// The backup file is missing at restore time
    #[error("Backup file not found: {}", .0.display())]
    BackupNotFound(PathBuf),

    /// The `.new` preservation copy could not be created
    #[error("Could not preserve {}: {reason}", .path.display())]
    PreserveFailed { path: PathBuf, reason: String },

    /// Copying the backup over the target failed
    #[error("Could not copy backup onto {}: {reason}", .target.display())]
    CopyFailed { target: PathBuf, reason: String },

    /// Restore requested with neither selected nor overridden backup
    #[error("No backup available for entry {0}")]
    NoBackupAvailable(String),

    /// `set_path` called with a file whose metadata disagrees with the entry
    #[error(
        "File does not match entry: expected '{expected_name}' ({expected_size} bytes), \
         found '{actual_name}' ({actual_size} bytes)"
    )]
    PathMismatch {
        expected_name: String,
        expected_size: u64,
        actual_name: String,
        actual_size: u64,
    },

    /// A caller-supplied file path does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No queue entry has this id
    #[error("Queue entry not found: {0}")]
    EntryNotFound(String),

    /// The queue can no longer be accessed (a holder of its lock panicked)
    #[error("Queue is unavailable: {0}")]
    QueueUnavailable(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl BakrError {
    /// Create an "entry not found" error
    pub fn entry_not_found(id: impl Into<String>) -> Self {
        Self::EntryNotFound(id.into())
    }

    /// Check if this is a "not found" error of any kind
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BackupNotFound(_) | Self::FileNotFound(_) | Self::EntryNotFound(_)
        )
    }

    /// Check if this error is a caller contract violation rather than a
    /// per-entry failure
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::EntryNotFound(_) | Self::QueueUnavailable(_))
    }
}

impl From<std::io::Error> for BakrError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BakrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for bakr operations
pub type BakrResult<T> = Result<T, BakrError>;
