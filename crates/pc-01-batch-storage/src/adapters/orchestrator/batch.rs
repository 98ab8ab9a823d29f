//! `FileOrchestrator` over a directory of time-named batch files.
//!
//! ## File Naming
//!
//! Batch files are named after their creation time in epoch milliseconds
//! (`1700000000123`). Names are strictly increasing within one orchestrator,
//! so numeric order is creation order. Each batch may have a sibling
//! `<name>_metadata` file. Anything else in the directory is ignored.
//!
//! ## Metrics
//!
//! Rotating away from a batch reports it closed; age and disk budget
//! cleanup report each deleted batch (`Obsolete`, `Purged`). A count of
//! batches pending upload is kept alongside: resynchronized from disk by
//! `readable_file`, incremented per new batch, decremented per deletion.
//!
//! ## Read/Write Separation
//!
//! Writers only reuse a file younger than 95% of `recent_delay`; readers
//! only pick files older than 105% of it. A file is never both.

use crate::adapters::file::ext;
use crate::adapters::metrics::TelemetryMetricsDispatcher;
use crate::domain::config::PersistenceConfig;
use crate::domain::metrics::{BatchClosedMetadata, RemovalReason};
use crate::ports::outbound::{FileOrchestrator, MetricsDispatcher, TimeProvider};
use parking_lot::Mutex;
use shared_types::{InternalLogger, Level, Target};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Suffix of the metadata file sibling to a batch.
pub const METADATA_SUFFIX: &str = "_metadata";

const MAINTAINER_TELEMETRY: &[Target] = &[Target::Maintainer, Target::Telemetry];

/// Bookkeeping of the file currently written to.
#[derive(Debug, Default)]
struct WriterState {
    previous_file: Option<PathBuf>,
    previous_item_count: u64,
    last_file_name: u64,
    last_access_ms: u64,
}

/// Rotating batch file policy for one directory.
pub struct BatchFileOrchestrator {
    root_dir: PathBuf,
    config: PersistenceConfig,
    time: Arc<dyn TimeProvider>,
    logger: Arc<dyn InternalLogger>,
    metrics: Arc<dyn MetricsDispatcher>,
    state: Mutex<WriterState>,
    last_cleanup: AtomicU64,
    pending_files: AtomicI64,
}

impl BatchFileOrchestrator {
    pub fn new(
        root_dir: impl Into<PathBuf>,
        config: PersistenceConfig,
        time: Arc<dyn TimeProvider>,
        logger: Arc<dyn InternalLogger>,
    ) -> Self {
        let metrics = Arc::new(TelemetryMetricsDispatcher::new(time.clone(), logger.clone()));
        Self {
            root_dir: root_dir.into(),
            config,
            time,
            logger,
            metrics,
            state: Mutex::new(WriterState::default()),
            last_cleanup: AtomicU64::new(0),
            pending_files: AtomicI64::new(0),
        }
    }

    /// Report batch metrics to `metrics` instead of the diagnostic channel.
    pub fn with_metrics_dispatcher(mut self, metrics: Arc<dyn MetricsDispatcher>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    // =========================================================================
    // ROOT DIRECTORY
    // =========================================================================

    fn is_root_dir_valid(&self) -> bool {
        let logger = self.logger.as_ref();
        if !ext::exists_safe(&self.root_dir, logger) {
            return self.create_root_dir();
        }
        if !ext::is_dir_safe(&self.root_dir, logger) {
            logger.log(
                Level::Error,
                MAINTAINER_TELEMETRY,
                &|| {
                    format!(
                        "The provided root file is not a directory: {}",
                        self.root_dir.display()
                    )
                },
                None,
            );
            return false;
        }
        if !ext::can_write_safe(&self.root_dir, logger) {
            logger.log(
                Level::Error,
                MAINTAINER_TELEMETRY,
                &|| format!("The provided root dir is not writable: {}", self.root_dir.display()),
                None,
            );
            return false;
        }
        true
    }

    fn create_root_dir(&self) -> bool {
        let created = ext::mkdirs_safe(&self.root_dir, self.logger.as_ref());
        if !created {
            self.logger.log(
                Level::Error,
                MAINTAINER_TELEMETRY,
                &|| format!("The provided root dir can't be created: {}", self.root_dir.display()),
                None,
            );
        }
        created
    }

    // =========================================================================
    // LISTING
    // =========================================================================

    /// Batch files with their timestamp, oldest first.
    fn sorted_batch_files(&self) -> Vec<(u64, PathBuf)> {
        let Some(files) = ext::list_files_safe(&self.root_dir, self.logger.as_ref()) else {
            return Vec::new();
        };
        let mut batches: Vec<(u64, PathBuf)> = files
            .into_iter()
            .filter_map(|path| batch_timestamp(&path).map(|ts| (ts, path)))
            .collect();
        batches.sort_by_key(|(ts, _)| *ts);
        batches
    }

    fn metadata_of(batch_file: &Path) -> PathBuf {
        let mut name = batch_file.as_os_str().to_os_string();
        name.push(METADATA_SUFFIX);
        PathBuf::from(name)
    }

    fn is_recent(&self, timestamp: u64, delay_ms: u64) -> bool {
        timestamp >= self.time.now_millis().saturating_sub(delay_ms)
    }

    // =========================================================================
    // CLEANUP
    // =========================================================================

    fn can_do_cleanup(&self) -> bool {
        let now = self.time.now_millis();
        let threshold = self.config.cleanup_frequency_threshold.as_millis() as u64;
        now.saturating_sub(self.last_cleanup.load(Ordering::Acquire)) > threshold
    }

    /// Delete batches older than `old_file_threshold`; returns the survivors.
    fn delete_obsolete_files(&self, files: Vec<(u64, PathBuf)>) -> Vec<(u64, PathBuf)> {
        let threshold = self
            .time
            .now_millis()
            .saturating_sub(self.config.old_file_threshold.as_millis() as u64);
        let logger = self.logger.as_ref();
        files
            .into_iter()
            .filter(|(ts, file)| {
                if *ts >= threshold {
                    return true;
                }
                if ext::delete_safe(file, logger) {
                    self.metrics.send_batch_deleted_metric(
                        file,
                        RemovalReason::Obsolete,
                        self.decrement_and_get_pending_files_count(),
                    );
                }
                let metadata = Self::metadata_of(file);
                if ext::exists_safe(&metadata, logger) {
                    ext::delete_safe(&metadata, logger);
                }
                false
            })
            .collect()
    }

    fn free_space_if_needed(&self, files: &[(u64, PathBuf)]) {
        let logger = self.logger.as_ref();
        let size_on_disk: u64 = files
            .iter()
            .map(|(_, file)| ext::len_safe(file, logger))
            .sum();
        let max_disk_space = self.config.max_disk_space;
        if size_on_disk <= max_disk_space {
            return;
        }
        let size_to_free = size_on_disk - max_disk_space;
        logger.log(
            Level::Error,
            MAINTAINER_TELEMETRY,
            &|| {
                format!(
                    "Too much disk space used ({}/{}): cleaning up to free {} bytes…",
                    size_on_disk, max_disk_space, size_to_free
                )
            },
            None,
        );

        let mut remaining = size_to_free;
        for (_, file) in files {
            if remaining == 0 {
                break;
            }
            let freed = self.delete_counting(file, true)
                + self.delete_counting(&Self::metadata_of(file), false);
            remaining = remaining.saturating_sub(freed);
        }
    }

    fn delete_counting(&self, file: &Path, send_metric: bool) -> u64 {
        let logger = self.logger.as_ref();
        if !ext::exists_safe(file, logger) {
            return 0;
        }
        let size = ext::len_safe(file, logger);
        if !ext::delete_safe(file, logger) {
            return 0;
        }
        if send_metric {
            self.metrics.send_batch_deleted_metric(
                file,
                RemovalReason::Purged,
                self.decrement_and_get_pending_files_count(),
            );
        }
        size
    }

    // =========================================================================
    // WRITABLE FILE SELECTION
    // =========================================================================

    fn reusable_writable_file(
        &self,
        state: &mut WriterState,
        min_remaining_capacity: u64,
    ) -> Option<PathBuf> {
        let (timestamp, last_file) = self.sorted_batch_files().pop()?;
        if state.previous_file.as_deref() != Some(last_file.as_path()) {
            // Written by a previous session, or our file was deleted: the
            // item count is unknown.
            return None;
        }

        let write_delay = self.config.recent_write_delay().as_millis() as u64;
        let is_recent_enough = self.is_recent(timestamp, write_delay);
        let has_room_for_more = ext::len_safe(&last_file, self.logger.as_ref())
            .saturating_add(min_remaining_capacity)
            <= self.config.max_batch_size;
        let has_slot_for_more = state.previous_item_count < self.config.max_items_per_batch;

        if is_recent_enough && has_room_for_more && has_slot_for_more {
            state.previous_item_count += 1;
            state.last_access_ms = self.time.now_millis();
            Some(last_file)
        } else {
            None
        }
    }

    fn create_new_file(&self, state: &mut WriterState) -> PathBuf {
        let now = self.time.now_millis();
        let name = now.max(state.last_file_name.saturating_add(1));
        let file = self.root_dir.join(name.to_string());
        if let Some(closed) = &state.previous_file {
            self.metrics.send_batch_closed_metric(
                closed,
                BatchClosedMetadata {
                    last_time_was_used_ms: state.last_access_ms,
                    events_count: state.previous_item_count,
                },
            );
        }
        state.last_file_name = name;
        state.previous_file = Some(file.clone());
        state.previous_item_count = 1;
        state.last_access_ms = now;
        self.pending_files.fetch_add(1, Ordering::AcqRel);
        file
    }
}

/// Timestamp encoded in a batch file name, `None` for other files.
fn batch_timestamp(path: &Path) -> Option<u64> {
    ext::file_name(path).and_then(|name| name.parse::<u64>().ok())
}

impl FileOrchestrator for BatchFileOrchestrator {
    fn writable_file(&self, min_remaining_capacity: u64) -> Option<PathBuf> {
        if !self.is_root_dir_valid() {
            return None;
        }

        if self.can_do_cleanup() {
            let files = self.delete_obsolete_files(self.sorted_batch_files());
            self.free_space_if_needed(&files);
            self.last_cleanup
                .store(self.time.now_millis(), Ordering::Release);
        }

        let mut state = self.state.lock();
        let file = self
            .reusable_writable_file(&mut state, min_remaining_capacity)
            .unwrap_or_else(|| self.create_new_file(&mut state));
        Some(file)
    }

    fn readable_file(&self, excluded: &HashSet<PathBuf>) -> Option<PathBuf> {
        if !self.is_root_dir_valid() {
            return None;
        }

        let files = self.delete_obsolete_files(self.sorted_batch_files());
        self.last_cleanup
            .store(self.time.now_millis(), Ordering::Release);
        self.pending_files
            .store(files.len() as i64, Ordering::Release);

        let read_delay = self.config.recent_read_delay().as_millis() as u64;
        files
            .into_iter()
            .find(|(ts, file)| !excluded.contains(file) && !self.is_recent(*ts, read_delay))
            .map(|(_, file)| file)
    }

    fn all_files(&self) -> Vec<PathBuf> {
        if !self.is_root_dir_valid() {
            return Vec::new();
        }
        self.sorted_batch_files()
            .into_iter()
            .map(|(_, file)| file)
            .collect()
    }

    fn root_dir(&self) -> Option<PathBuf> {
        if !self.is_root_dir_valid() {
            return None;
        }
        Some(self.root_dir.clone())
    }

    fn metadata_file(&self, batch_file: &Path) -> Option<PathBuf> {
        if batch_file.parent() != Some(self.root_dir.as_path()) {
            self.logger.log(
                Level::Debug,
                MAINTAINER_TELEMETRY,
                &|| {
                    format!(
                        "The file provided ({}) doesn't belong to the current folder ({})",
                        batch_file.display(),
                        self.root_dir.display()
                    )
                },
                None,
            );
        }

        if batch_timestamp(batch_file).is_some() {
            Some(Self::metadata_of(batch_file))
        } else {
            self.logger.log(
                Level::Error,
                MAINTAINER_TELEMETRY,
                &|| format!("The file provided is not a batch file: {}", batch_file.display()),
                None,
            );
            None
        }
    }

    fn decrement_and_get_pending_files_count(&self) -> i64 {
        self.pending_files.fetch_sub(1, Ordering::AcqRel) - 1
    }
}
