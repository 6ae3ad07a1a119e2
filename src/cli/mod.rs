//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod history;
pub mod locate;
pub mod queue;
pub mod restore;

pub use history::{handle_history_command, HistoryArgs};
pub use locate::{handle_locate_command, handle_preview_command, LocateArgs, PreviewArgs};
pub use queue::{handle_queue_command, QueueCommands};
pub use restore::{handle_restore_command, RestoreArgs};

use crate::services::format_progress;
use crate::services::BatchOrchestrator;

/// Print progress callbacks as `[ 50%] message` lines
pub(crate) fn attach_progress_printer(orchestrator: &BatchOrchestrator) {
    orchestrator.set_progress_callback(|progress, message| {
        println!("{}", format_progress(progress, message));
    });
}
