//! Restore history for bakr
//!
//! Every restore attempt made through the orchestrator is recorded in an
//! append-only history log.
//!
//! # Architecture
//!
//! - `AuditEntry`: one restore attempt with its outcome and the paths
//!   involved
//! - `AuditLogger`: writes entries to the history file using a
//!   line-delimited JSON format (JSONL)
//!
//! # Example
//!
//! ```rust,ignore
//! use bakr::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.history_log());
//! let result = executor.restore(&target, &backup);
//! logger.log(&AuditEntry::from_result(None, &result))?;
//!
//! for entry in logger.read_recent(20)? {
//!     println!("{}", entry.format_human_readable());
//! }
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Outcome};
pub use logger::AuditLogger;
