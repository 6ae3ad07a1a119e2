//! JSON export of the queue snapshot

use std::io::Write;

use crate::error::{BakrError, BakrResult};
use crate::queue::QueueSnapshot;

/// Write the snapshot as pretty-printed JSON
pub fn export_queue_json<W: Write>(snapshot: &QueueSnapshot, writer: &mut W) -> BakrResult<()> {
    serde_json::to_writer_pretty(&mut *writer, snapshot)
        .map_err(|e| BakrError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BakrError::Export(e.to_string()))?;
    Ok(())
}

/// Parse and validate a JSON export
pub fn import_queue_json(json_str: &str) -> BakrResult<QueueSnapshot> {
    let snapshot: QueueSnapshot =
        serde_json::from_str(json_str).map_err(|e| BakrError::Export(e.to_string()))?;
    snapshot.validate()?;
    Ok(snapshot)
}
