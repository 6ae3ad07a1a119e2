//! Path management for bakr
//!
//! Provides platform-appropriate path resolution for settings, the persisted
//! queue, the restore history, logs, and the trash directory.
//!
//! ## Path Resolution Order
//!
//! 1. `BAKR_DATA_DIR` environment variable (if set)
//! 2. The platform config directory reported by `directories`
//!    (`~/.config/bakr` on Linux, `~/Library/Application Support/bakr` on
//!    macOS, `%APPDATA%\bakr\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BakrError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BAKR_DATA_DIR";

/// Manages all paths used by bakr
#[derive(Debug, Clone)]
pub struct BakrPaths {
    /// Base directory for all bakr data
    base_dir: PathBuf,
}

impl BakrPaths {
    /// Create a new BakrPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform config directory can be determined.
    pub fn new() -> Result<Self, BakrError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create BakrPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the persisted queue snapshot
    pub fn queue_file(&self) -> PathBuf {
        self.base_dir.join("queue.json")
    }

    /// Get the path to the restore history (JSON lines)
    pub fn history_log(&self) -> PathBuf {
        self.base_dir.join("history.log")
    }

    /// Get the path to the trace log
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("bakr.log")
    }

    /// Get the directory consumed backups are moved into
    pub fn trash_dir(&self) -> PathBuf {
        self.base_dir.join("trash")
    }

    /// Ensure the base and trash directories exist
    pub fn ensure_directories(&self) -> Result<(), BakrError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BakrError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.trash_dir())
            .map_err(|e| BakrError::Io(format!("Failed to create trash directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, BakrError> {
    ProjectDirs::from("", "", "bakr")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| BakrError::Config("Could not determine a config directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BakrPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.trash_dir(), temp_dir.path().join("trash"));
        assert_eq!(paths.queue_file(), temp_dir.path().join("queue.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BakrPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.trash_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BakrPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.history_log(), temp_dir.path().join("history.log"));
        assert_eq!(paths.log_file(), temp_dir.path().join("bakr.log"));
    }
}
