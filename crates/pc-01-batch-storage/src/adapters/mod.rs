//! # Adapters Module
//!
//! Concrete implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `file`: Safe file helpers, raw/event file I/O, file mover
//! - `orchestrator`: Time-named batch files with rotation and cleanup
//! - `migration`: Consent transition handling
//! - `datastore`: TLV-backed keyed values
//! - `metrics`: Batch metrics as telemetry diagnostics
//! - `lock`: Process-level storage lock (feature `locking`)
//! - `infra`: Clocks

pub mod datastore;
pub mod file;
pub mod infra;
#[cfg(feature = "locking")]
pub mod lock;
pub mod metrics;
pub mod migration;
pub mod orchestrator;

pub use datastore::{DataStoreContent, DataStoreFileHandler, DataStoreRead};
pub use file::{DefaultFileMover, PlainBatchFileReaderWriter, PlainFileReaderWriter};
pub use infra::{ManualTimeProvider, SystemTimeProvider};
#[cfg(feature = "locking")]
pub use lock::{LockError, RootDirLock};
pub use metrics::TelemetryMetricsDispatcher;
pub use migration::{ConsentAwareFileMigrator, MigrationOperation, RetryPolicy};
pub use orchestrator::BatchFileOrchestrator;
