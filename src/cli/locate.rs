//! Locate and preview commands
//!
//! Read-only: neither command touches the filesystem.

use std::path::PathBuf;

use clap::Args;

use crate::backup::{Disposer, RestoreExecutor};
use crate::config::{BakrPaths, Settings};
use crate::display::{format_preview, format_search_plan};
use crate::error::BakrResult;
use crate::locator::BackupLocator;

/// Arguments for `bakr locate`
#[derive(Args)]
pub struct LocateArgs {
    /// File to find a backup for
    pub file: PathBuf,

    /// Show every location probed
    #[arg(short, long)]
    pub explain: bool,
}

/// Arguments for `bakr preview`
#[derive(Args)]
pub struct PreviewArgs {
    /// File that would be restored
    pub target: PathBuf,

    /// Backup to restore from (located automatically if omitted)
    pub backup: Option<PathBuf>,
}

/// Handle `bakr locate`
pub fn handle_locate_command(settings: &Settings, args: LocateArgs) -> BakrResult<()> {
    let locator = BackupLocator::from_settings(&settings.search);

    if args.explain {
        print!("{}", format_search_plan(&locator.search_plan(&args.file)));
        return Ok(());
    }

    match locator.locate(&args.file) {
        Some(found) => println!("{}", found.display()),
        None => println!("No backup found for {}", args.file.display()),
    }
    Ok(())
}

/// Handle `bakr preview`
pub fn handle_preview_command(
    paths: &BakrPaths,
    settings: &Settings,
    args: PreviewArgs,
) -> BakrResult<()> {
    let backup = match args.backup {
        Some(backup) => backup,
        None => match BackupLocator::from_settings(&settings.search).locate(&args.target) {
            Some(found) => found,
            None => {
                println!("No backup found for {}", args.target.display());
                return Ok(());
            }
        },
    };

    let disposer = Disposer::new(settings.restore.dispose, paths.trash_dir());
    let executor = RestoreExecutor::new(disposer);
    print!("{}", format_preview(&executor.preview(&args.target, &backup)));
    Ok(())
}
