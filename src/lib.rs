//! bakr - find and restore backup copies of files
//!
//! This library locates the backup counterpart of a target file and
//! restores it without destroying the displaced original, tracking the work
//! across a queue of files with progress reporting and cancellation.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `locator`: two-phase backup search (same directory, then ancestors)
//! - `backup`: the preserve-then-overwrite restore protocol
//! - `models`: queue entries, backup candidates, statuses
//! - `queue`: the ordered queue, summaries and snapshots
//! - `services`: the batch orchestrator, progress and cancellation
//! - `audit`: append-only restore history
//! - `storage`: atomic JSON persistence of the queue
//! - `export`: JSON, YAML and CSV output
//! - `config`: configuration and path management
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use bakr::services::BatchOrchestrator;
//!
//! let orchestrator = BatchOrchestrator::default();
//! orchestrator.set_progress_callback(|p, msg| println!("{:.0}% {}", p * 100.0, msg));
//!
//! let id = orchestrator.add_file(Path::new("notes.txt"))?;
//! orchestrator.batch_scan()?;
//! orchestrator.batch_restore(None)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod locator;
pub mod logging;
pub mod models;
pub mod queue;
pub mod services;
pub mod storage;

pub use error::BakrError;
