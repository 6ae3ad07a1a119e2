//! YAML export of the queue snapshot, for human reading

use std::io::Write;

use crate::error::{BakrError, BakrResult};
use crate::queue::QueueSnapshot;

/// Write the snapshot as YAML with a comment header
pub fn export_queue_yaml<W: Write>(snapshot: &QueueSnapshot, writer: &mut W) -> BakrResult<()> {
    let export_err = |e: std::io::Error| BakrError::Export(e.to_string());

    writeln!(writer, "# bakr queue export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", snapshot.exported_at).map_err(export_err)?;
    writeln!(writer, "# Entries: {}", snapshot.entries.len()).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, snapshot).map_err(|e| BakrError::Export(e.to_string()))?;
    Ok(())
}

/// Parse and validate a YAML export
pub fn import_queue_yaml(yaml_str: &str) -> BakrResult<QueueSnapshot> {
    let snapshot: QueueSnapshot =
        serde_yaml::from_str(yaml_str).map_err(|e| BakrError::Export(e.to_string()))?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryId, QueueEntry};
    use crate::queue::Queue;
    use std::path::PathBuf;

    #[test]
    fn test_yaml_export() {
        let mut queue = Queue::new();
        queue.insert(QueueEntry::new(
            EntryId::from("notes.txt_3_1"),
            "notes.txt",
            3,
            Some(PathBuf::from("/data/notes.txt")),
        ));
        let snapshot = QueueSnapshot::capture(&queue);

        let mut buffer = Vec::new();
        export_queue_yaml(&snapshot, &mut buffer).unwrap();
        let yaml = String::from_utf8(buffer).unwrap();

        assert!(yaml.starts_with("# bakr queue export"));
        assert!(yaml.contains("notes.txt_3_1"));
        assert_eq!(import_queue_yaml(&yaml).unwrap(), snapshot);
    }
}
