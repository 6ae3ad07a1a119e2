//! Queue display formatting

use super::{format_size, separator, truncate};
use crate::models::{EntryStatus, QueueEntry};
use crate::queue::QueueSummary;

const MESSAGE_WIDTH: usize = 48;

/// Format entries as a table
pub fn format_queue_list(entries: &[QueueEntry]) -> String {
    if entries.is_empty() {
        return "Queue is empty.".to_string();
    }

    let id_width = entries
        .iter()
        .map(|e| e.id.as_str().len())
        .max()
        .unwrap_or(2)
        .max(2);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$}  {:<10}  {:>10}  {:>7}  {}\n",
        "ID",
        "Status",
        "Size",
        "Backups",
        "Message",
        id_width = id_width,
    ));
    output.push_str(&format!(
        "{:-<id_width$}  {:-<10}  {:->10}  {:->7}  {:-<20}\n",
        "",
        "",
        "",
        "",
        "",
        id_width = id_width,
    ));

    for entry in entries {
        let backups = match (&entry.selected_backup, entry.backups.len()) {
            (Some(_), n) => format!("{}*", n),
            (None, n) => n.to_string(),
        };
        output.push_str(&format!(
            "{:<id_width$}  {:<10}  {:>10}  {:>7}  {}\n",
            entry.id.as_str(),
            entry.status.as_str(),
            format_size(entry.size),
            backups,
            truncate(&entry.message, MESSAGE_WIDTH),
            id_width = id_width,
        ));
    }

    output
}

/// Format one entry with its candidates
pub fn format_entry_details(entry: &QueueEntry) -> String {
    let mut output = String::new();

    output.push_str(&format!("Entry: {}\n", entry.id));
    output.push_str(&format!("  Name:     {}\n", entry.name));
    output.push_str(&format!(
        "  Path:     {}\n",
        entry
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    ));
    output.push_str(&format!("  Size:     {}\n", format_size(entry.size)));
    output.push_str(&format!("  Status:   {}\n", entry.status));
    output.push_str(&format!("  Message:  {}\n", entry.message));
    output.push_str(&format!(
        "  Added:    {}\n",
        entry.added_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if entry.backups.is_empty() {
        output.push_str("  Backups:  none\n");
    } else {
        output.push_str("  Backups:\n");
        for candidate in &entry.backups {
            let marker = if entry.selected_backup.as_ref() == Some(&candidate.path) {
                "*"
            } else {
                " "
            };
            output.push_str(&format!(
                "   {} {}  ({}, modified {})\n",
                marker,
                candidate.path.display(),
                candidate.size_display(),
                candidate.modified_time.format("%Y-%m-%d %H:%M:%S")
            ));
        }
    }

    output
}

/// Format the one-line-per-field summary
pub fn format_summary(summary: &QueueSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Files: {} ({})\n",
        summary.total_files,
        format_size(summary.total_size)
    ));

    let counts: Vec<String> = EntryStatus::ALL
        .iter()
        .map(|status| format!("{} {}", summary.count(*status), status))
        .collect();
    output.push_str(&format!("Status: {}\n", counts.join(", ")));
    output.push_str(&format!(
        "With backups: {}, restorable: {}\n",
        summary.items_with_backups, summary.restorable_items
    ));
    if summary.is_processing {
        output.push_str("A batch is in progress.\n");
    }

    output
}

/// Plain-text status report: summary followed by entries grouped by status
pub fn format_status_report(summary: &QueueSummary, entries: &[QueueEntry]) -> String {
    let mut output = String::new();
    output.push_str("Queue Status Report\n");
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format_summary(summary));

    for status in EntryStatus::ALL {
        let group: Vec<&QueueEntry> = entries.iter().filter(|e| e.status == status).collect();
        if group.is_empty() {
            continue;
        }

        output.push('\n');
        output.push_str(&format!("{} ({})\n", status.as_str().to_uppercase(), group.len()));
        for entry in group {
            output.push_str(&format!("  {}  {}\n", entry.name, entry.message));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BackupCandidate, EntryId, PLACEHOLDER_SIMILARITY};
    use crate::queue::Queue;
    use chrono::Utc;
    use std::path::PathBuf;

    fn sample() -> Vec<QueueEntry> {
        let mut found = QueueEntry::new(
            EntryId::from("notes.txt_3_1"),
            "notes.txt",
            3,
            Some(PathBuf::from("/data/notes.txt")),
        );
        found.add_backup(BackupCandidate {
            path: PathBuf::from("/data/notes.txt.bak"),
            name: "notes.txt.bak".into(),
            size: 2048,
            modified_time: Utc::now(),
            similarity: PLACEHOLDER_SIMILARITY,
            kind: ".bak".into(),
        });
        found.select_default_backup();
        found.update_status(EntryStatus::Completed, "Found backup notes.txt.bak");

        let waiting = QueueEntry::new(EntryId::from("b.txt_9_1"), "b.txt", 9, None);
        vec![found, waiting]
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_queue_list(&[]), "Queue is empty.");
    }

    #[test]
    fn test_list_marks_selection() {
        let output = format_queue_list(&sample());
        assert!(output.contains("notes.txt_3_1"));
        assert!(output.contains("1*"));
        assert!(output.contains("pending"));
    }

    #[test]
    fn test_details() {
        let entries = sample();
        let output = format_entry_details(&entries[0]);
        assert!(output.contains("* /data/notes.txt.bak"));
        assert!(output.contains("2.0 KB"));

        let output = format_entry_details(&entries[1]);
        assert!(output.contains("(not set)"));
        assert!(output.contains("Backups:  none"));
    }

    #[test]
    fn test_status_report_groups() {
        let entries = sample();
        let queue = Queue::from_entries(entries.clone());
        let summary = QueueSummary::of(&queue, false);

        let report = format_status_report(&summary, &entries);
        assert!(report.contains("Files: 2"));
        assert!(report.contains("COMPLETED (1)"));
        assert!(report.contains("PENDING (1)"));
        assert!(!report.contains("ERROR"));
        // The sample backup does not exist on disk
        assert!(report.contains("With backups: 1, restorable: 0"));
    }
}
