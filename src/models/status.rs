//! Entry status
//!
//! `Pending -> Processing -> {Completed, Error}`, with `Cancelled` reserved
//! for entries still pending when a batch cancellation is observed.
//! Terminal states may re-enter `Processing` on a rescan or re-restore.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing status of a queue entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Registered; nothing attempted yet, or still awaiting a path
    #[default]
    Pending,
    /// A scan or restore is running for this entry
    Processing,
    /// Last scan found a backup, or last restore succeeded
    Completed,
    /// Last scan found nothing, or last operation failed
    Error,
    /// Batch was cancelled before this entry was reached
    Cancelled,
}

impl EntryStatus {
    /// Every status, in display order
    pub const ALL: [EntryStatus; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Error,
        Self::Cancelled,
    ];

    /// Check if a scan or restore is running for the entry
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Processing)
    }

    /// Check if the entry has reached an outcome
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Cancelled)
    }

    /// Lowercase name used in reports and serialized data
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Processing => write!(f, "Processing"),
            Self::Completed => write!(f, "Completed"),
            Self::Error => write!(f, "Error"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}
