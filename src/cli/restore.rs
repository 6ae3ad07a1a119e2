//! One-shot restore command
//!
//! Queues the given files, scans them, and restores only with `--force`.
//! Nothing is persisted besides the restore history.

use std::path::PathBuf;

use clap::Args;

use super::attach_progress_printer;
use crate::config::{BakrPaths, Settings};
use crate::error::{BakrError, BakrResult};
use crate::models::EntryStatus;
use crate::services::BatchOrchestrator;

/// Arguments for `bakr restore`
#[derive(Args)]
pub struct RestoreArgs {
    /// Files to restore
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Restore from this backup instead of searching (single file only)
    #[arg(short, long)]
    pub backup: Option<PathBuf>,

    /// Perform the restore instead of printing the plan
    #[arg(short, long)]
    pub force: bool,
}

/// Handle `bakr restore`
pub fn handle_restore_command(
    paths: &BakrPaths,
    settings: &Settings,
    args: RestoreArgs,
) -> BakrResult<()> {
    if args.backup.is_some() && args.files.len() != 1 {
        return Err(BakrError::Validation(
            "--backup can only be used with a single file".into(),
        ));
    }

    let orchestrator = BatchOrchestrator::from_settings(settings, paths);
    let ids = args
        .files
        .iter()
        .map(|file| orchestrator.add_file(file))
        .collect::<BakrResult<Vec<_>>>()?;

    if let Some(backup) = &args.backup {
        let id = &ids[0];
        if !args.force {
            let target = &args.files[0];
            println!("Would restore {} from {}", target.display(), backup.display());
            println!("Run again with --force to restore.");
            return Ok(());
        }
        attach_progress_printer(&orchestrator);
        return if orchestrator.restore_one(id, Some(backup))? {
            Ok(())
        } else {
            Err(BakrError::Validation("Restore failed".into()))
        };
    }

    if !args.force {
        orchestrator.batch_scan()?;
        println!("Restore plan:");
        for entry in orchestrator.entries()? {
            match &entry.selected_backup {
                Some(backup) => println!("  {} <- {}", entry.name, backup.display()),
                None => println!("  {} (no backup found)", entry.name),
            }
        }
        println!("Run again with --force to restore.");
        return Ok(());
    }

    attach_progress_printer(&orchestrator);
    orchestrator.batch_scan()?;
    orchestrator.batch_restore(None)?;

    let entries = orchestrator.entries()?;
    let failed = entries
        .iter()
        .filter(|e| e.status == EntryStatus::Error)
        .count();
    if failed > 0 {
        return Err(BakrError::Validation(format!(
            "{} of {} files could not be restored",
            failed,
            entries.len()
        )));
    }
    Ok(())
}
