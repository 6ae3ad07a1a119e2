//! Service layer for bakr
//!
//! The orchestrator drives the locator and the restore executor across the
//! queue, with progress reporting and cooperative cancellation.

pub mod orchestrator;
pub mod progress;

pub use orchestrator::BatchOrchestrator;
pub use progress::{format_progress, CancelHandle, ProgressCallback};
