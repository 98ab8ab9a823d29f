//! # Consent-Aware Storage Service
//!
//! Routes writes by tracking consent and hands batches to the uploader at
//! most once at a time.
//!
//! ## Batch Lifecycle
//!
//! ```text
//! Writable ──→ Readable(unlocked) ──read_next_batch──→ Readable(locked)
//!                     ↑                                      │
//!                     └──────── mark_as_read(false) ─────────┤
//!                                                            ↓
//!                                       mark_as_read(true) → Deleted
//! ```
//!
//! ## Locking
//!
//! - `consent` (`RwLock`): writes hold it shared for the duration of their
//!   callback; `set_consent` holds it exclusively while the migration runs,
//!   so no write under the new consent starts before the data has moved.
//! - `locked_batches` (`Mutex`): "choose and lock" and "unlock" happen under
//!   it, so two readers never receive the same file.

mod confirmation;
mod reader;
mod storage;
mod writer;

use crate::adapters::file::ext;
use crate::adapters::{
    BatchFileOrchestrator, ConsentAwareFileMigrator, DefaultFileMover,
    PlainBatchFileReaderWriter, PlainFileReaderWriter, SystemTimeProvider,
    TelemetryMetricsDispatcher,
};
use crate::domain::config::PersistenceConfig;
use crate::domain::errors::PersistenceError;
use crate::domain::metrics::RemovalReason;
use crate::ports::outbound::{
    BatchFileReaderWriter, DataMigrator, FileMover, FileOrchestrator, FileReaderWriter,
    MetricsDispatcher, TimeProvider,
};
use parking_lot::{Mutex, RwLock};
use shared_types::{InternalLogger, Level, Target, TrackingConsent};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Collaborators of `ConsentAwareStorage`.
pub struct StorageDependencies {
    pub pending_orchestrator: Arc<dyn FileOrchestrator>,
    pub granted_orchestrator: Arc<dyn FileOrchestrator>,
    pub batch_reader_writer: Arc<dyn BatchFileReaderWriter>,
    pub metadata_reader_writer: Arc<dyn FileReaderWriter>,
    pub file_mover: Arc<dyn FileMover>,
    pub migrator: Arc<dyn DataMigrator>,
    pub metrics_dispatcher: Arc<dyn MetricsDispatcher>,
    pub logger: Arc<dyn InternalLogger>,
}

/// Durable event queue of one feature.
pub struct ConsentAwareStorage {
    pub(crate) pending: Arc<dyn FileOrchestrator>,
    pub(crate) granted: Arc<dyn FileOrchestrator>,
    pub(crate) batch_rw: Arc<dyn BatchFileReaderWriter>,
    pub(crate) metadata_rw: Arc<dyn FileReaderWriter>,
    pub(crate) file_mover: Arc<dyn FileMover>,
    pub(crate) migrator: Arc<dyn DataMigrator>,
    pub(crate) metrics: Arc<dyn MetricsDispatcher>,
    pub(crate) logger: Arc<dyn InternalLogger>,
    pub(crate) config: PersistenceConfig,
    /// Consent applied by `write_with_tracked_consent`.
    pub(crate) consent: RwLock<TrackingConsent>,
    /// Batches currently handed out to a reader.
    pub(crate) locked_batches: Mutex<HashSet<PathBuf>>,
    #[cfg(feature = "locking")]
    _root_lock: Option<crate::adapters::RootDirLock>,
}

impl ConsentAwareStorage {
    /// Suffix of the directory holding batches written under PENDING.
    pub const PENDING_DIR_SUFFIX: &'static str = "-pending-v2";
    /// Suffix of the directory holding batches written under GRANTED.
    pub const GRANTED_DIR_SUFFIX: &'static str = "-v2";

    /// Create the storage and run the initial migration for `consent`.
    ///
    /// With no previous consent, whatever is left in the pending area by an
    /// earlier process is discarded.
    pub fn new(
        deps: StorageDependencies,
        config: PersistenceConfig,
        consent: TrackingConsent,
    ) -> Self {
        deps.migrator.migrate_data(
            None,
            consent,
            deps.pending_orchestrator.as_ref(),
            deps.granted_orchestrator.as_ref(),
        );
        Self {
            pending: deps.pending_orchestrator,
            granted: deps.granted_orchestrator,
            batch_rw: deps.batch_reader_writer,
            metadata_rw: deps.metadata_reader_writer,
            file_mover: deps.file_mover,
            migrator: deps.migrator,
            metrics: deps.metrics_dispatcher,
            logger: deps.logger,
            config,
            consent: RwLock::new(consent),
            locked_batches: Mutex::new(HashSet::new()),
            #[cfg(feature = "locking")]
            _root_lock: None,
        }
    }

    /// Open the file-backed storage of `feature` under `storage_dir`.
    ///
    /// Batches go to `<feature>-pending-v2` and `<feature>-v2`. With the
    /// `locking` feature, `<storage_dir>/<feature>` is locked against other
    /// processes for the lifetime of the storage.
    pub fn open(
        storage_dir: &Path,
        feature: &str,
        consent: TrackingConsent,
        config: PersistenceConfig,
        logger: Arc<dyn InternalLogger>,
    ) -> Result<Self, PersistenceError> {
        if storage_dir.exists() && !storage_dir.is_dir() {
            return Err(PersistenceError::NotADirectory(storage_dir.to_path_buf()));
        }

        #[cfg(feature = "locking")]
        let root_lock = crate::adapters::RootDirLock::acquire(
            &storage_dir.join(feature),
            std::time::Duration::from_secs(1),
        )
        .map_err(|e| PersistenceError::Locked(e.to_string()))?;

        let time: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
        let metrics: Arc<dyn MetricsDispatcher> =
            Arc::new(TelemetryMetricsDispatcher::new(time.clone(), logger.clone()));
        let orchestrator = |suffix: &str| -> Arc<dyn FileOrchestrator> {
            Arc::new(
                BatchFileOrchestrator::new(
                    storage_dir.join(format!("{feature}{suffix}")),
                    config.clone(),
                    time.clone(),
                    logger.clone(),
                )
                .with_metrics_dispatcher(metrics.clone()),
            )
        };
        let file_mover: Arc<dyn FileMover> = Arc::new(DefaultFileMover::new(logger.clone()));
        let deps = StorageDependencies {
            pending_orchestrator: orchestrator(Self::PENDING_DIR_SUFFIX),
            granted_orchestrator: orchestrator(Self::GRANTED_DIR_SUFFIX),
            batch_reader_writer: Arc::new(PlainBatchFileReaderWriter::new(logger.clone())),
            metadata_reader_writer: Arc::new(PlainFileReaderWriter::new(logger.clone())),
            file_mover: file_mover.clone(),
            migrator: Arc::new(ConsentAwareFileMigrator::new(file_mover, logger.clone())),
            metrics_dispatcher: metrics.clone(),
            logger: logger.clone(),
        };

        logger.log_to(
            Level::Debug,
            Target::Maintainer,
            &|| {
                format!(
                    "Opening batch storage {} in {} with consent {}",
                    feature,
                    storage_dir.display(),
                    consent
                )
            },
            None,
        );

        #[allow(unused_mut)]
        let mut storage = Self::new(deps, config, consent);
        #[cfg(feature = "locking")]
        {
            storage._root_lock = Some(root_lock);
        }
        Ok(storage)
    }

    /// The consent applied by `write_with_tracked_consent`.
    pub fn consent(&self) -> TrackingConsent {
        *self.consent.read()
    }

    /// Switch to `new` consent, migrating buffered data first.
    ///
    /// Blocks until in-flight writes finish; writes issued meanwhile wait for
    /// the migration.
    pub fn set_consent(&self, new: TrackingConsent) {
        let mut consent = self.consent.write();
        let previous = *consent;
        if previous == new {
            return;
        }
        self.migrator
            .migrate_data(Some(previous), new, self.pending.as_ref(), self.granted.as_ref());
        *consent = new;
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// Number of batches currently handed out to a reader.
    pub fn locked_batch_count(&self) -> usize {
        self.locked_batches.lock().len()
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    pub(crate) fn orchestrator_for(&self, consent: TrackingConsent) -> Option<&dyn FileOrchestrator> {
        match consent {
            TrackingConsent::Granted => Some(self.granted.as_ref()),
            TrackingConsent::Pending => Some(self.pending.as_ref()),
            TrackingConsent::NotGranted => None,
        }
    }

    /// Delete a granted batch and its metadata, logging failures.
    pub(crate) fn delete_batch(&self, file: &Path) -> bool {
        self.delete_batch_of(self.granted.as_ref(), file)
    }

    /// Delete a batch the reader confirmed and report it.
    pub(crate) fn delete_confirmed_batch(&self, file: &Path) {
        if self.delete_batch(file) {
            self.metrics.send_batch_deleted_metric(
                file,
                RemovalReason::Confirmed,
                self.granted.decrement_and_get_pending_files_count(),
            );
        }
    }

    /// Whether the batch file itself was deleted.
    pub(crate) fn delete_batch_of(
        &self,
        orchestrator: &dyn FileOrchestrator,
        file: &Path,
    ) -> bool {
        let deleted = self.delete_logged(file);
        if let Some(metadata) = orchestrator.metadata_file(file) {
            if ext::exists_safe(&metadata, self.logger.as_ref()) {
                self.delete_logged(&metadata);
            }
        }
        deleted
    }

    fn delete_logged(&self, file: &Path) -> bool {
        let deleted = self.file_mover.delete(file);
        if !deleted {
            self.logger.log_to(
                Level::Warn,
                Target::Maintainer,
                &|| format!("Unable to delete file: {}", file.display()),
                None,
            );
        }
        deleted
    }

    pub(crate) fn unlock(&self, file: &Path) {
        self.locked_batches.lock().remove(file);
    }
}
