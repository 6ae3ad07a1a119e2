//! Export module for bakr
//!
//! - JSON: machine-readable queue snapshot
//! - YAML: human-readable queue snapshot
//! - CSV: per-entry status report (spreadsheet-compatible)

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_report_csv;
pub use json::{export_queue_json, import_queue_json};
pub use yaml::{export_queue_yaml, import_queue_yaml};

use std::io::Write;
use std::path::Path;

use crate::error::BakrResult;
use crate::queue::QueueSnapshot;

/// Snapshot export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Write `snapshot` in this format
    pub fn write<W: Write>(&self, snapshot: &QueueSnapshot, writer: &mut W) -> BakrResult<()> {
        match self {
            Self::Json => export_queue_json(snapshot, writer),
            Self::Yaml => export_queue_yaml(snapshot, writer),
        }
    }
}
