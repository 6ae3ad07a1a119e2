//! Core data models for bakr
//!
//! - `BackupCandidate`: a discovered backup file
//! - `QueueEntry`: one target file and its restore state
//! - `EntryStatus`: the entry state machine
//! - `EntryId`: queue-unique identifier

pub mod candidate;
pub mod entry;
pub mod ids;
pub mod status;

pub use candidate::{BackupCandidate, PLACEHOLDER_SIMILARITY};
pub use entry::QueueEntry;
pub use ids::EntryId;
pub use status::EntryStatus;
