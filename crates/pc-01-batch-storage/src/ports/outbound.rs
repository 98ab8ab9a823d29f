//! # Outbound Ports (Driven Ports)
//!
//! Collaborators required by the consent-aware storage.
//!
//! Production implementations live in `crate::adapters`; tests substitute
//! their own where a real file system is inconvenient.

use crate::domain::metrics::{BatchClosedMetadata, RemovalReason};
use shared_types::{RawBatchEvent, TrackingConsent};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Policy selecting which batch file is writable or readable.
///
/// Implementations apply their own rotation rules (size, age, item count,
/// disk budget).
pub trait FileOrchestrator: Send + Sync {
    /// The file currently open for writing an event of
    /// `min_remaining_capacity` bytes, creating or rotating as needed.
    fn writable_file(&self, min_remaining_capacity: u64) -> Option<PathBuf>;

    /// The next file ready for upload that is not in `excluded`.
    fn readable_file(&self, excluded: &HashSet<PathBuf>) -> Option<PathBuf>;

    /// Every batch file managed by this orchestrator, oldest first.
    fn all_files(&self) -> Vec<PathBuf>;

    /// Files that should be uploaded on an explicit flush.
    fn flushable_files(&self) -> Vec<PathBuf> {
        self.all_files()
    }

    /// Directory holding the batches, if usable.
    fn root_dir(&self) -> Option<PathBuf>;

    /// Sibling metadata file of `batch_file`.
    fn metadata_file(&self, batch_file: &Path) -> Option<PathBuf>;

    /// Account for a batch deleted outside the orchestrator; returns the
    /// number of batches still pending upload.
    fn decrement_and_get_pending_files_count(&self) -> i64;
}

/// Event-level I/O on batch files.
pub trait BatchFileReaderWriter: Send + Sync {
    /// Write one framed event. Must be a single append so concurrent
    /// appends never interleave partial records.
    fn write_event(&self, file: &Path, event: &RawBatchEvent, append: bool) -> bool;

    /// Every event in `file`, or the valid prefix if the file is damaged.
    fn read_events(&self, file: &Path) -> Vec<RawBatchEvent>;
}

/// Raw byte I/O (metadata files, datastore entries).
pub trait FileReaderWriter: Send + Sync {
    fn write_data(&self, file: &Path, data: &[u8], append: bool) -> bool;

    /// File content; empty when unreadable.
    fn read_data(&self, file: &Path) -> Vec<u8>;
}

/// Bulk file operations used by deletion and migration.
pub trait FileMover: Send + Sync {
    /// Delete a file or a directory tree. A missing target counts as deleted.
    fn delete(&self, target: &Path) -> bool;

    /// Move every file of `src_dir` into `dst_dir`.
    fn move_files(&self, src_dir: &Path, dst_dir: &Path) -> bool;
}

/// Relocates or discards buffered data on a consent transition.
///
/// Runs to completion before returning; the storage does not accept writes
/// under `new` until it has.
pub trait DataMigrator: Send + Sync {
    fn migrate_data(
        &self,
        previous: Option<TrackingConsent>,
        new: TrackingConsent,
        pending: &dyn FileOrchestrator,
        granted: &dyn FileOrchestrator,
    );
}

/// Sink for batch lifecycle metrics.
pub trait MetricsDispatcher: Send + Sync {
    /// The orchestrator stopped writing to `batch_file`.
    fn send_batch_closed_metric(&self, batch_file: &Path, metadata: BatchClosedMetadata);

    /// `batch_file` was deleted; `pending_batches` remain.
    fn send_batch_deleted_metric(
        &self,
        batch_file: &Path,
        reason: RemovalReason,
        pending_batches: i64,
    );
}

/// Wall clock in milliseconds since the Unix epoch.
pub trait TimeProvider: Send + Sync {
    fn now_millis(&self) -> u64;
}
