//! Queue CLI commands
//!
//! The queue lives in `queue.json` between invocations. Each command loads
//! it into an orchestrator, runs, and saves it back if anything changed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::attach_progress_printer;
use crate::config::{BakrPaths, Settings};
use crate::display::{format_entry_details, format_queue_list, format_status_report};
use crate::error::{BakrError, BakrResult};
use crate::export::{export_report_csv, ExportFormat};
use crate::models::EntryId;
use crate::services::BatchOrchestrator;
use crate::storage::QueueStore;

/// Snapshot formats accepted by `queue export`
#[derive(Clone, Copy, ValueEnum)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl From<SnapshotFormat> for ExportFormat {
    fn from(format: SnapshotFormat) -> Self {
        match format {
            SnapshotFormat::Json => ExportFormat::Json,
            SnapshotFormat::Yaml => ExportFormat::Yaml,
        }
    }
}

/// Queue subcommands
#[derive(Subcommand)]
pub enum QueueCommands {
    /// Add files to the queue
    Add {
        /// Files to add
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Register a file by name and size, to be given a path later
    Expect {
        /// File name
        name: String,
        /// Size in bytes
        size: u64,
    },

    /// Give a path to an entry registered with `expect`
    Bind {
        /// Entry ID
        id: String,
        /// Path of the file
        path: PathBuf,
    },

    /// List queued entries
    List {
        /// Show every entry in detail
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show one entry in detail
    Show {
        /// Entry ID
        id: String,
    },

    /// Scan one entry, or every pending entry
    Scan {
        /// Entry ID (all pending entries if omitted)
        id: Option<String>,
    },

    /// Choose which discovered backup to restore from
    Select {
        /// Entry ID
        id: String,
        /// Path of a discovered backup
        backup: PathBuf,
    },

    /// Restore entries with a selected backup
    Restore {
        /// Entry IDs (all entries with a selection if omitted)
        ids: Vec<String>,
    },

    /// Remove an entry
    Remove {
        /// Entry ID
        id: String,
    },

    /// Remove every entry
    Clear,

    /// Print a status report
    Report {
        /// Write CSV instead of text
        #[arg(long)]
        csv: bool,
    },

    /// Export the queue snapshot
    Export {
        /// Output file
        output: PathBuf,

        /// Format (guessed from the extension if omitted)
        #[arg(short, long, value_enum)]
        format: Option<SnapshotFormat>,
    },
}

/// Handle a queue command
pub fn handle_queue_command(
    paths: &BakrPaths,
    settings: &Settings,
    cmd: QueueCommands,
) -> BakrResult<()> {
    let store = QueueStore::from_paths(paths);
    let orchestrator = BatchOrchestrator::from_settings(settings, paths);
    orchestrator.load_snapshot(store.load()?)?;
    attach_progress_printer(&orchestrator);

    let modified = run(&orchestrator, cmd)?;

    if modified {
        store.save(&orchestrator.snapshot()?)?;
    }
    Ok(())
}

/// Run one command; returns whether the queue needs saving
fn run(orchestrator: &BatchOrchestrator, cmd: QueueCommands) -> BakrResult<bool> {
    match cmd {
        QueueCommands::Add { files } => {
            for file in files {
                let id = orchestrator.add_file(&file)?;
                println!("Queued {} as {}", file.display(), id);
            }
            Ok(true)
        }

        QueueCommands::Expect { name, size } => {
            let id = orchestrator.add_entry(&name, size, None)?;
            println!("Queued {} as {} (waiting for a path)", name, id);
            Ok(true)
        }

        QueueCommands::Bind { id, path } => {
            orchestrator.set_path(&EntryId::from(id.as_str()), &path)?;
            println!("Bound {} to {}", id, path.display());
            Ok(true)
        }

        QueueCommands::List { verbose } => {
            let entries = orchestrator.entries()?;
            if verbose && !entries.is_empty() {
                for entry in &entries {
                    println!("{}", format_entry_details(entry));
                }
            } else {
                println!("{}", format_queue_list(&entries));
            }
            Ok(false)
        }

        QueueCommands::Show { id } => {
            let entry = orchestrator
                .entry(&EntryId::from(id.as_str()))?
                .ok_or_else(|| BakrError::entry_not_found(id))?;
            print!("{}", format_entry_details(&entry));
            Ok(false)
        }

        QueueCommands::Scan { id: Some(id) } => {
            let id = EntryId::from(id);
            if !orchestrator.scan_one(&id)? {
                if let Some(entry) = orchestrator.entry(&id)? {
                    println!("{}: {}", entry.id, entry.message);
                }
            }
            Ok(true)
        }

        QueueCommands::Scan { id: None } => {
            if !orchestrator.batch_scan()? {
                println!("Nothing to scan.");
            }
            Ok(true)
        }

        QueueCommands::Select { id, backup } => {
            orchestrator.select_backup(&EntryId::from(id.as_str()), &backup)?;
            println!("Selected {} for {}", backup.display(), id);
            Ok(true)
        }

        QueueCommands::Restore { ids } => {
            let ids: Vec<EntryId> = ids.into_iter().map(EntryId::from).collect();
            let subset = if ids.is_empty() { None } else { Some(ids.as_slice()) };
            if !orchestrator.batch_restore(subset)? {
                println!("Nothing to restore.");
            }
            Ok(true)
        }

        QueueCommands::Remove { id } => {
            if orchestrator.remove_entry(&EntryId::from(id.as_str()))? {
                println!("Removed {}", id);
                Ok(true)
            } else {
                Err(BakrError::entry_not_found(id))
            }
        }

        QueueCommands::Clear => {
            let count = orchestrator.len()?;
            orchestrator.clear()?;
            println!("Removed {} entries.", count);
            Ok(true)
        }

        QueueCommands::Report { csv } => {
            let entries = orchestrator.entries()?;
            if csv {
                export_report_csv(&entries, io::stdout().lock())?;
            } else {
                print!(
                    "{}",
                    format_status_report(&orchestrator.summary()?, &entries)
                );
            }
            Ok(false)
        }

        QueueCommands::Export { output, format } => {
            let format = format
                .map(ExportFormat::from)
                .or_else(|| ExportFormat::from_path(&output))
                .unwrap_or_default();

            let file = File::create(&output).map_err(|e| {
                BakrError::Export(format!("Failed to create {}: {}", output.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            format.write(&orchestrator.snapshot()?, &mut writer)?;
            writer
                .flush()
                .map_err(|e| BakrError::Export(e.to_string()))?;

            println!("Exported queue to {}", output.display());
            Ok(false)
        }
    }
}
