//! Restore system for bakr
//!
//! Restores a target file from a chosen backup without destroying anything
//! along the way.
//!
//! # Architecture
//!
//! - `RestoreExecutor`: runs the preserve-then-overwrite protocol and
//!   previews it
//! - `preserve`: preservation naming and metadata-carrying copies
//! - `Disposer`: moves consumed backups into the trash directory
//!
//! # Preservation Format
//!
//! Before the target is overwritten its current content is copied to:
//! - `<target>.new`, or
//! - `<target>.new.YYYYMMDD_HHMMSS` if that already exists, or
//! - `<target>.new.YYYYMMDD_HHMMSS_N` if that exists too
//!
//! # Example
//!
//! ```rust,ignore
//! use bakr::backup::{Disposer, RestoreExecutor};
//!
//! let executor = RestoreExecutor::new(Disposer::trash(paths.trash_dir()));
//!
//! let preview = executor.preview(&target, &backup);
//! if preview.can_restore {
//!     let result = executor.restore(&target, &backup);
//!     println!("{}", result.summary());
//! }
//! ```

mod dispose;
pub mod preserve;
mod preview;
mod restore;

pub use dispose::Disposer;
pub use preview::{FileState, RestorePreview};
pub use restore::{RestoreExecutor, RestoreFailure, RestoreResult};
