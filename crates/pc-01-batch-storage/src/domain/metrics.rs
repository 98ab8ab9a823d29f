//! # Batch Metrics
//!
//! Values reported when a batch file is closed or deleted.

use std::fmt;

/// Why a batch file was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalReason {
    /// Older than `old_file_threshold`.
    Obsolete,
    /// Evicted to get back under `max_disk_space`.
    Purged,
    /// Deleted by the reader through `mark_as_read(true)`.
    Confirmed,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::Obsolete => write!(f, "obsolete"),
            RemovalReason::Purged => write!(f, "purged"),
            RemovalReason::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// State of a batch at the moment the orchestrator stops writing to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchClosedMetadata {
    /// Epoch millis of the last write handed to the batch.
    pub last_time_was_used_ms: u64,
    /// Number of events written to the batch.
    pub events_count: u64,
}
