//! Audit logger for the append-only restore history
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{BakrError, BakrResult};

use super::entry::AuditEntry;

/// Handles writing audit entries to the history file
///
/// The file uses a line-delimited JSON format (JSONL) where each line
/// is a complete JSON object representing one restore attempt.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    /// Path to the history file
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new AuditLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry, flushing before returning
    pub fn log(&self, entry: &AuditEntry) -> BakrResult<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BakrError::Io(format!("Failed to create history directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| BakrError::Io(format!("Failed to open history log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| BakrError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| BakrError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| BakrError::Io(format!("Failed to flush history log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    ///
    /// Lines that fail to parse are skipped. A truncated trailing line from
    /// an interrupted write must not hide the rest of the history.
    pub fn read_all(&self) -> BakrResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BakrError::Io(format!("Failed to open history log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                BakrError::Io(format!("Failed to read history line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(line = line_num + 1, error = %e, "Skipping unreadable history line"),
            }
        }

        Ok(entries)
    }

    /// Read the most recent N entries
    pub fn read_recent(&self, count: usize) -> BakrResult<Vec<AuditEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Delete the history file
    pub fn clear(&self) -> BakrResult<()> {
        match fs::remove_file(&self.log_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BakrError::Io(format!("Failed to clear history log: {}", e))),
        }
    }

    /// Check if the history file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the history file
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}
