//! History command

use clap::Args;

use crate::audit::AuditLogger;
use crate::config::BakrPaths;
use crate::error::BakrResult;

/// Arguments for `bakr history`
#[derive(Args)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Delete the history
    #[arg(long)]
    pub clear: bool,
}

/// Handle `bakr history`
pub fn handle_history_command(paths: &BakrPaths, args: HistoryArgs) -> BakrResult<()> {
    let logger = AuditLogger::new(paths.history_log());

    if args.clear {
        logger.clear()?;
        println!("History cleared.");
        return Ok(());
    }

    let entries = logger.read_recent(args.limit)?;
    if entries.is_empty() {
        println!("No restores recorded.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
