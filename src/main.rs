use anyhow::Result;
use clap::{Parser, Subcommand};

use bakr::cli::{
    handle_history_command, handle_locate_command, handle_preview_command, handle_queue_command,
    handle_restore_command, HistoryArgs, LocateArgs, PreviewArgs, QueueCommands, RestoreArgs,
};
use bakr::config::{BakrPaths, Settings};
use bakr::logging::init_logging;

#[derive(Parser)]
#[command(
    name = "bakr",
    version,
    about = "Find and restore backup copies of files",
    long_about = "bakr locates the backup counterpart of a file (file.txt.bak, \
                  file.txt.old, or a backup in a parent directory) and restores \
                  it, keeping the displaced original as file.txt.new."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the backup of a file
    Locate(LocateArgs),

    /// Show what a restore would do
    Preview(PreviewArgs),

    /// Restore files from their backups
    Restore(RestoreArgs),

    /// Manage the persistent restore queue
    #[command(subcommand)]
    Queue(QueueCommands),

    /// Show the restore history
    History(HistoryArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BakrPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let _log_guard = init_logging(&paths, &settings.log_level)?;

    match cli.command {
        Some(Commands::Locate(args)) => handle_locate_command(&settings, args)?,
        Some(Commands::Preview(args)) => handle_preview_command(&paths, &settings, args)?,
        Some(Commands::Restore(args)) => handle_restore_command(&paths, &settings, args)?,
        Some(Commands::Queue(cmd)) => handle_queue_command(&paths, &settings, cmd)?,
        Some(Commands::History(args)) => handle_history_command(&paths, args)?,
        Some(Commands::Config) => {
            println!("bakr Configuration");
            println!("==================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Queue file:      {}", paths.queue_file().display());
            println!("History log:     {}", paths.history_log().display());
            println!("Trace log:       {}", paths.log_file().display());
            println!("Trash directory: {}", paths.trash_dir().display());
            println!();
            println!("Settings:");
            println!("  Extensions:          {}", settings.search.extensions.join(", "));
            println!("  Max ancestor levels: {}", settings.search.max_ancestor_levels);
            println!("  Dispose mode:        {:?}", settings.restore.dispose);
            println!("  Log level:           {}", settings.log_level);
        }
        None => {
            println!("bakr - find and restore backup copies of files");
            println!();
            println!("Run 'bakr --help' for usage information.");
        }
    }

    Ok(())
}
