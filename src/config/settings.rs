//! User settings for bakr
//!
//! Manages the backup search policy, what happens to a backup once it has
//! been restored, and the default log level.

use serde::{Deserialize, Serialize};

use super::paths::BakrPaths;
use crate::error::BakrError;

/// Extensions recognized as backups when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 3] = [".bak", ".backup", ".old"];

/// Ancestor levels searched when none are configured
pub const DEFAULT_MAX_ANCESTOR_LEVELS: usize = 5;

/// Backup search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Recognized backup extensions, in priority order
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// How many directories to walk upward in the ancestor fallback
    #[serde(default = "default_max_ancestor_levels")]
    pub max_ancestor_levels: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            max_ancestor_levels: default_max_ancestor_levels(),
        }
    }
}

impl SearchSettings {
    /// Normalize extensions to carry a leading dot and reject an empty list
    pub fn normalized(mut self) -> Result<Self, BakrError> {
        self.extensions = self
            .extensions
            .iter()
            .map(|ext| ext.trim())
            .filter(|ext| !ext.is_empty() && *ext != ".")
            .map(|ext| {
                if ext.starts_with('.') {
                    ext.to_string()
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        if self.extensions.is_empty() {
            return Err(BakrError::Config(
                "At least one backup extension must be configured".into(),
            ));
        }

        Ok(self)
    }
}

/// What to do with a backup after it has been restored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisposeMode {
    /// Move the consumed backup into the trash directory
    #[default]
    Trash,
    /// Move the consumed backup to the operating system's trash
    System,
    /// Leave the consumed backup where it is
    Keep,
}

/// Restore settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RestoreSettings {
    /// Disposal of consumed backups
    #[serde(default)]
    pub dispose: DisposeMode,
}

/// User settings for bakr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backup search policy
    #[serde(default)]
    pub search: SearchSettings,

    /// Restore policy
    #[serde(default)]
    pub restore: RestoreSettings,

    /// Default tracing filter when `BAKR_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_max_ancestor_levels() -> usize {
    DEFAULT_MAX_ANCESTOR_LEVELS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            search: SearchSettings::default(),
            restore: RestoreSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BakrPaths) -> Result<Self, BakrError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BakrError::Io(format!("Failed to read settings file: {}", e)))?;

        let mut settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| BakrError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.search = settings.search.normalized()?;

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BakrPaths) -> Result<(), BakrError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BakrError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BakrError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
