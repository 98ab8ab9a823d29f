//! # Metrics Dispatch
//!
//! Default `MetricsDispatcher`: each metric becomes an INFO diagnostic
//! addressed to TELEMETRY, carrying its attributes as `key=value` pairs.

use crate::adapters::file::ext;
use crate::domain::metrics::{BatchClosedMetadata, RemovalReason};
use crate::ports::outbound::{MetricsDispatcher, TimeProvider};
use shared_types::{InternalLogger, Level, Target};
use std::path::Path;
use std::sync::Arc;

pub const BATCH_CLOSED_MESSAGE: &str = "[Mobile Metric] Batch Closed";
pub const BATCH_DELETED_MESSAGE: &str = "[Mobile Metric] Batch Deleted";

/// Reports batch metrics on the diagnostic channel.
pub struct TelemetryMetricsDispatcher {
    time: Arc<dyn TimeProvider>,
    logger: Arc<dyn InternalLogger>,
}

impl TelemetryMetricsDispatcher {
    pub fn new(time: Arc<dyn TimeProvider>, logger: Arc<dyn InternalLogger>) -> Self {
        Self { time, logger }
    }
}

/// Creation time encoded in the batch name.
fn created_at(batch_file: &Path) -> Option<u64> {
    ext::file_name(batch_file).and_then(|name| name.parse().ok())
}

impl MetricsDispatcher for TelemetryMetricsDispatcher {
    fn send_batch_closed_metric(&self, batch_file: &Path, metadata: BatchClosedMetadata) {
        let Some(created) = created_at(batch_file) else {
            return;
        };
        let duration = metadata.last_time_was_used_ms.saturating_sub(created);
        let size = ext::len_safe(batch_file, self.logger.as_ref());
        self.logger.log_to(
            Level::Info,
            Target::Telemetry,
            &|| {
                format!(
                    "{BATCH_CLOSED_MESSAGE}: batch_duration={duration}ms batch_events_count={} batch_size={size}",
                    metadata.events_count
                )
            },
            None,
        );
    }

    fn send_batch_deleted_metric(
        &self,
        batch_file: &Path,
        reason: RemovalReason,
        pending_batches: i64,
    ) {
        let Some(created) = created_at(batch_file) else {
            return;
        };
        let age = self.time.now_millis().saturating_sub(created);
        self.logger.log_to(
            Level::Info,
            Target::Telemetry,
            &|| {
                format!(
                    "{BATCH_DELETED_MESSAGE}: batch_age={age}ms batch_removal_reason={reason} pending_batches={pending_batches}"
                )
            },
            None,
        );
    }
}
