//! # Batch Storage (pc-01)
//!
//! The on-device durable event queue underneath every telemetry pillar
//! (logs, traces, RUM, session replay). Producers append serialized events
//! to batch files; a background uploader reads each batch, then deletes or
//! releases it.
//!
//! ## Consent Routing
//!
//! ```text
//! write(GRANTED) ─────→ <feature>-v2/          ──→ read_next_batch
//! write(PENDING) ─────→ <feature>-pending-v2/  ──(PENDING → GRANTED)──┘
//! write(NOT_GRANTED) ─→ discarded, reported as success
//! ```
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | At most one reader per batch | Locked-batch set, choose-and-lock under one mutex |
//! | No torn records | One append per framed event |
//! | Crash tolerance | Decoding keeps the valid prefix of a damaged file |
//! | Migration before new-consent writes | Consent `RwLock` held across the migration |
//! | Bounded disk usage | Orchestrator cleanup (age, disk budget) |
//! | Host never sees an error | Failures become diagnostics plus `false`/no-op |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - TLV codec, batch framing, ids, config, errors
//! - `ports/` - Inbound storage API, outbound collaborators
//! - `adapters/` - File system, orchestrator, migration, datastore, lock
//! - `service/` - `ConsentAwareStorage`
//!
//! ## Usage
//!
//! ```ignore
//! use pc_01_batch_storage::{ConsentAwareStorage, EventStorage, PersistenceConfig};
//! use shared_types::{RawBatchEvent, TrackingConsent, TracingLogger};
//!
//! let storage = ConsentAwareStorage::open(
//!     dir, "logs", TrackingConsent::Pending,
//!     PersistenceConfig::from_env(), Arc::new(TracingLogger::default()),
//! )?;
//!
//! storage.write_current_batch(TrackingConsent::Granted, |writer| {
//!     writer.write(&RawBatchEvent::new(payload), None);
//! });
//!
//! storage.read_next_batch(
//!     || {},
//!     |id, reader| upload(id, reader.read()),
//! );
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use adapters::{
    BatchFileOrchestrator, ConsentAwareFileMigrator, DataStoreContent, DataStoreFileHandler,
    DataStoreRead, DefaultFileMover, ManualTimeProvider, PlainBatchFileReaderWriter,
    PlainFileReaderWriter, RetryPolicy, SystemTimeProvider, TelemetryMetricsDispatcher,
};
#[cfg(feature = "locking")]
pub use adapters::{LockError, RootDirLock};
pub use domain::batch_id::BatchId;
pub use domain::config::PersistenceConfig;
pub use domain::errors::{PersistenceError, TlvError};
pub use domain::metrics::{BatchClosedMetadata, RemovalReason};
pub use domain::tlv::{TlvBlock, TlvBlockReader, TlvBlockType};
pub use ports::inbound::{BatchConfirmation, BatchReader, EventBatchWriter, EventStorage};
pub use ports::outbound::{
    BatchFileReaderWriter, DataMigrator, FileMover, FileOrchestrator, FileReaderWriter,
    MetricsDispatcher, TimeProvider,
};
pub use service::{ConsentAwareStorage, StorageDependencies};
