//! CSV status report
//!
//! One row per queue entry, spreadsheet-compatible.

use std::io::Write;

use serde::Serialize;

use crate::error::{BakrError, BakrResult};
use crate::models::QueueEntry;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    id: &'a str,
    name: &'a str,
    path: String,
    size: u64,
    status: &'a str,
    backups: usize,
    selected_backup: String,
    message: &'a str,
    last_modified_at: String,
}

impl<'a> ReportRow<'a> {
    fn of(entry: &'a QueueEntry) -> Self {
        Self {
            id: entry.id.as_str(),
            name: &entry.name,
            path: entry
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            size: entry.size,
            status: entry.status.as_str(),
            backups: entry.backups.len(),
            selected_backup: entry
                .selected_backup
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            message: &entry.message,
            last_modified_at: entry.last_modified_at.to_rfc3339(),
        }
    }
}

/// Write a status report for `entries`
pub fn export_report_csv<W: Write>(entries: &[QueueEntry], writer: W) -> BakrResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for entry in entries {
        csv_writer
            .serialize(ReportRow::of(entry))
            .map_err(|e| BakrError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| BakrError::Export(e.to_string()))?;
    Ok(())
}
