//! Shared fixtures for scenarios and benchmarks.

use pc_01_batch_storage::{
    BatchFileOrchestrator, BatchId, ConsentAwareFileMigrator, ConsentAwareStorage,
    DefaultFileMover, EventStorage, FileMover, FileOrchestrator, ManualTimeProvider,
    MetricsDispatcher, PersistenceConfig, PlainBatchFileReaderWriter, PlainFileReaderWriter,
    RetryPolicy, StorageDependencies, TelemetryMetricsDispatcher, TimeProvider,
};
use shared_types::{CapturingLogger, InternalLogger, RawBatchEvent, TrackingConsent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Wall-clock-like start time for the manual clock.
pub const START_MILLIS: u64 = 1_700_000_000_000;

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration with a one second recent delay.
pub fn fast_config() -> PersistenceConfig {
    PersistenceConfig::default().with_recent_delay(Duration::from_secs(1))
}

/// `ConsentAwareStorage` of feature "logs" in a temp dir, on a manual clock.
pub struct StorageHarness {
    pub dir: TempDir,
    pub clock: Arc<ManualTimeProvider>,
    pub logs: Arc<CapturingLogger>,
    pub storage: ConsentAwareStorage,
}

impl StorageHarness {
    pub fn new(consent: TrackingConsent) -> Self {
        Self::with_config(consent, fast_config())
    }

    pub fn with_config(consent: TrackingConsent, config: PersistenceConfig) -> Self {
        let dir = TempDir::new().expect("temp dir");
        Self::in_dir(dir, consent, config)
    }

    /// Build over an existing directory, as a restarted process would.
    pub fn in_dir(dir: TempDir, consent: TrackingConsent, config: PersistenceConfig) -> Self {
        let clock = Arc::new(ManualTimeProvider::new(START_MILLIS));
        let logs = Arc::new(CapturingLogger::new());
        let logger: Arc<dyn InternalLogger> = logs.clone();
        let time: Arc<dyn TimeProvider> = clock.clone();
        let metrics: Arc<dyn MetricsDispatcher> =
            Arc::new(TelemetryMetricsDispatcher::new(time.clone(), logger.clone()));
        let orchestrator = |suffix: &str| -> Arc<dyn FileOrchestrator> {
            Arc::new(
                BatchFileOrchestrator::new(
                    dir.path().join(format!("logs{suffix}")),
                    config.clone(),
                    time.clone(),
                    logger.clone(),
                )
                .with_metrics_dispatcher(metrics.clone()),
            )
        };
        let file_mover: Arc<dyn FileMover> = Arc::new(DefaultFileMover::new(logger.clone()));
        let deps = StorageDependencies {
            pending_orchestrator: orchestrator(ConsentAwareStorage::PENDING_DIR_SUFFIX),
            granted_orchestrator: orchestrator(ConsentAwareStorage::GRANTED_DIR_SUFFIX),
            batch_reader_writer: Arc::new(PlainBatchFileReaderWriter::new(logger.clone())),
            metadata_reader_writer: Arc::new(PlainFileReaderWriter::new(logger.clone())),
            file_mover: file_mover.clone(),
            migrator: Arc::new(
                ConsentAwareFileMigrator::new(file_mover, logger.clone()).with_retry_policy(
                    RetryPolicy {
                        max_attempts: 3,
                        delay: Duration::ZERO,
                    },
                ),
            ),
            metrics_dispatcher: metrics,
            logger,
        };
        let storage = ConsentAwareStorage::new(deps, config, consent);
        Self {
            dir,
            clock,
            logs,
            storage,
        }
    }

    /// Drop the storage, keeping its files.
    pub fn into_dir(self) -> TempDir {
        self.dir
    }

    pub fn granted_dir(&self) -> PathBuf {
        self.dir.path().join("logs-v2")
    }

    pub fn pending_dir(&self) -> PathBuf {
        self.dir.path().join("logs-pending-v2")
    }

    /// Advance past the read delay so every written batch is readable.
    pub fn age_batches(&self) {
        let read_delay = self.storage.config().recent_read_delay();
        self.clock.advance(read_delay + Duration::from_millis(1));
    }

    /// Advance past the write delay so the next write opens a new batch.
    pub fn rotate(&self) {
        let write_delay = self.storage.config().recent_write_delay();
        self.clock.advance(write_delay + Duration::from_millis(1));
    }

    pub fn write(&self, consent: TrackingConsent, data: &[u8]) -> bool {
        let mut written = false;
        self.storage.write_current_batch(consent, |writer| {
            written = writer.write(&RawBatchEvent::new(data), None);
        });
        written
    }

    pub fn read(&self) -> Option<(BatchId, Vec<RawBatchEvent>)> {
        let mut batch = None;
        self.storage
            .read_next_batch(|| {}, |id, reader| batch = Some((id, reader.read())));
        batch
    }

    pub fn confirm(&self, id: &BatchId, delete: bool) {
        self.storage
            .confirm_batch_read(id, |confirmation| confirmation.mark_as_read(delete));
    }

    /// Read and delete every readable batch; returns the event payloads.
    pub fn drain(&self) -> Vec<Vec<u8>> {
        let mut payloads = Vec::new();
        while let Some((id, events)) = self.read() {
            payloads.extend(events.into_iter().map(|e| e.data));
            self.confirm(&id, true);
        }
        payloads
    }
}

/// Regular files directly in `dir`, sorted by name.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
