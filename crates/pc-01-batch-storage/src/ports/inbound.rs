//! # Inbound Ports (Driving Ports)
//!
//! The API used by producers (pillar writers) and the consumer (uploader).
//!
//! Writer, reader and confirmation values are scoped to a single callback
//! invocation and must not be retained beyond it.

use crate::domain::batch_id::BatchId;
use shared_types::{RawBatchEvent, TrackingConsent};

/// Appends events to the batch currently open for writing.
pub trait EventBatchWriter {
    /// Metadata last written for the current batch, if any.
    fn current_metadata(&self) -> Option<Vec<u8>>;

    /// Append `event` and, on success, replace the batch metadata with
    /// `batch_metadata` when provided and non-empty.
    ///
    /// An empty event succeeds without any I/O.
    fn write(&self, event: &RawBatchEvent, batch_metadata: Option<&[u8]>) -> bool;
}

/// Read-only view of one locked batch.
pub trait BatchReader {
    /// Every event currently in the batch, in write order. Idempotent.
    fn read(&self) -> Vec<RawBatchEvent>;

    /// The batch metadata, if any.
    fn current_metadata(&self) -> Option<Vec<u8>>;
}

/// Consent-aware event storage.
///
/// No method returns an error: failures are reported on the diagnostic
/// channel and surface as `false` / no-op results.
pub trait EventStorage: Send + Sync {
    /// Run `callback` with a writer for the batch matching `consent`.
    ///
    /// The callback is invoked exactly once, synchronously. It must not call
    /// back into the storage.
    fn write_current_batch<F>(&self, consent: TrackingConsent, callback: F)
    where
        F: FnOnce(&dyn EventBatchWriter);

    /// Lock the next uploadable batch and hand it to `on_batch`, or call
    /// `on_no_batch` if there is none.
    fn read_next_batch<N, B>(&self, on_no_batch: N, on_batch: B)
    where
        N: FnOnce(),
        B: FnOnce(BatchId, &dyn BatchReader);

    /// Run `callback` with the confirmation for `batch_id`.
    ///
    /// No-op if no batch is currently locked under that id.
    fn confirm_batch_read<F>(&self, batch_id: &BatchId, callback: F)
    where
        F: FnOnce(Box<dyn BatchConfirmation + '_>);

    /// Delete every batch, locked or not, in every consent area.
    fn drop_all(&self);
}

/// One-shot verdict on a batch handed out by `read_next_batch`.
pub trait BatchConfirmation {
    /// `delete = true` removes the batch; `false` unlocks it for a later
    /// read. Either way the batch leaves the locked set.
    ///
    /// Dropping the confirmation without calling this keeps the batch locked.
    fn mark_as_read(self: Box<Self>, delete: bool);
}
