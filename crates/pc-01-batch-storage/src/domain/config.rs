//! # Persistence Configuration
//!
//! Tuning for batch sizes, rotation and disk usage.
//!
//! All values have defaults suited to a mobile device; hosts may override
//! them programmatically (`with_*`) or through `PULSE_*` environment
//! variables (`from_env`).

use std::env;
use std::time::Duration;

/// Configuration for the batch storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceConfig {
    /// Maximum size of a single serialized event in bytes (default: 512 KiB).
    pub max_item_size: u64,

    /// Size above which a batch file is no longer written to (default: 4 MiB).
    pub max_batch_size: u64,

    /// Maximum number of events per batch file (default: 500).
    pub max_items_per_batch: u64,

    /// Age below which a batch is considered "in use" (default: 5s).
    ///
    /// Writers reuse files younger than 95% of this value; readers only pick
    /// files older than 105% of it, so both never touch the same file.
    pub recent_delay: Duration,

    /// Batches older than this are deleted unread (default: 18h).
    pub old_file_threshold: Duration,

    /// Disk budget of one orchestrator directory (default: 128 MiB).
    pub max_disk_space: u64,

    /// Minimum interval between two cleanup passes (default: 5s).
    pub cleanup_frequency_threshold: Duration,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_item_size: 512 * 1024,
            max_batch_size: 4 * 1024 * 1024,
            max_items_per_batch: 500,
            recent_delay: Duration::from_secs(5),
            old_file_threshold: Duration::from_secs(18 * 60 * 60),
            max_disk_space: 128 * 1024 * 1024,
            cleanup_frequency_threshold: Duration::from_secs(5),
        }
    }
}

impl PersistenceConfig {
    /// Environment variable overriding `max_item_size` (bytes).
    pub const ENV_MAX_ITEM_SIZE: &'static str = "PULSE_MAX_ITEM_SIZE";
    /// Environment variable overriding `max_batch_size` (bytes).
    pub const ENV_MAX_BATCH_SIZE: &'static str = "PULSE_MAX_BATCH_SIZE";
    /// Environment variable overriding `max_items_per_batch`.
    pub const ENV_MAX_ITEMS_PER_BATCH: &'static str = "PULSE_MAX_ITEMS_PER_BATCH";
    /// Environment variable overriding `recent_delay` (milliseconds).
    pub const ENV_RECENT_DELAY_MS: &'static str = "PULSE_RECENT_DELAY_MS";
    /// Environment variable overriding `old_file_threshold` (milliseconds).
    pub const ENV_OLD_FILE_THRESHOLD_MS: &'static str = "PULSE_OLD_FILE_THRESHOLD_MS";
    /// Environment variable overriding `max_disk_space` (bytes).
    pub const ENV_MAX_DISK_SPACE: &'static str = "PULSE_MAX_DISK_SPACE";
    /// Environment variable overriding `cleanup_frequency_threshold` (milliseconds).
    pub const ENV_CLEANUP_FREQUENCY_MS: &'static str = "PULSE_CLEANUP_FREQUENCY_MS";

    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Missing or unparseable variables keep their default value.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let millis = |key: &str| number(key).map(Duration::from_millis);

        Self {
            max_item_size: number(Self::ENV_MAX_ITEM_SIZE).unwrap_or(defaults.max_item_size),
            max_batch_size: number(Self::ENV_MAX_BATCH_SIZE).unwrap_or(defaults.max_batch_size),
            max_items_per_batch: number(Self::ENV_MAX_ITEMS_PER_BATCH)
                .unwrap_or(defaults.max_items_per_batch),
            recent_delay: millis(Self::ENV_RECENT_DELAY_MS).unwrap_or(defaults.recent_delay),
            old_file_threshold: millis(Self::ENV_OLD_FILE_THRESHOLD_MS)
                .unwrap_or(defaults.old_file_threshold),
            max_disk_space: number(Self::ENV_MAX_DISK_SPACE).unwrap_or(defaults.max_disk_space),
            cleanup_frequency_threshold: millis(Self::ENV_CLEANUP_FREQUENCY_MS)
                .unwrap_or(defaults.cleanup_frequency_threshold),
        }
    }

    /// Set the maximum single item size.
    pub fn with_max_item_size(mut self, size: u64) -> Self {
        self.max_item_size = size;
        self
    }

    /// Set the maximum batch file size.
    pub fn with_max_batch_size(mut self, size: u64) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Set the maximum number of items per batch.
    pub fn with_max_items_per_batch(mut self, count: u64) -> Self {
        self.max_items_per_batch = count;
        self
    }

    /// Set the recent delay.
    pub fn with_recent_delay(mut self, delay: Duration) -> Self {
        self.recent_delay = delay;
        self
    }

    /// Set the obsolete file threshold.
    pub fn with_old_file_threshold(mut self, threshold: Duration) -> Self {
        self.old_file_threshold = threshold;
        self
    }

    /// Set the disk budget.
    pub fn with_max_disk_space(mut self, bytes: u64) -> Self {
        self.max_disk_space = bytes;
        self
    }

    /// Set the cleanup frequency.
    pub fn with_cleanup_frequency_threshold(mut self, threshold: Duration) -> Self {
        self.cleanup_frequency_threshold = threshold;
        self
    }

    /// Age under which the writer keeps appending to the latest file.
    pub fn recent_write_delay(&self) -> Duration {
        self.recent_delay * 95 / 100
    }

    /// Age under which the reader leaves a file alone.
    pub fn recent_read_delay(&self) -> Duration {
        self.recent_delay * 105 / 100
    }
}
