//! `DataMigrator` driven by consent transitions.

use super::MigrationOperation;
use crate::ports::outbound::{DataMigrator, FileMover, FileOrchestrator};
use shared_types::{InternalLogger, Level, Target, TrackingConsent};
use std::sync::Arc;
use std::time::Duration;

/// How many times a migration step is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// Migrates the pending area on consent changes.
pub struct ConsentAwareFileMigrator {
    file_mover: Arc<dyn FileMover>,
    logger: Arc<dyn InternalLogger>,
    retry: RetryPolicy,
}

impl ConsentAwareFileMigrator {
    pub fn new(file_mover: Arc<dyn FileMover>, logger: Arc<dyn InternalLogger>) -> Self {
        Self {
            file_mover,
            logger,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The operation for a transition.
    pub fn operation_for(
        previous: Option<TrackingConsent>,
        new: TrackingConsent,
        pending: &dyn FileOrchestrator,
        granted: &dyn FileOrchestrator,
    ) -> MigrationOperation {
        use TrackingConsent::*;
        match (previous, new) {
            (None, _)
            | (Some(Pending), NotGranted)
            | (Some(Granted), Pending)
            | (Some(NotGranted), Pending) => MigrationOperation::WipeData {
                dir: pending.root_dir(),
            },
            (Some(Pending), Granted) => MigrationOperation::MoveData {
                from: pending.root_dir(),
                to: granted.root_dir(),
            },
            _ => MigrationOperation::NoOp,
        }
    }
}

impl DataMigrator for ConsentAwareFileMigrator {
    fn migrate_data(
        &self,
        previous: Option<TrackingConsent>,
        new: TrackingConsent,
        pending: &dyn FileOrchestrator,
        granted: &dyn FileOrchestrator,
    ) {
        let operation = Self::operation_for(previous, new, pending, granted);
        if operation == MigrationOperation::NoOp {
            return;
        }
        self.logger.log_to(
            Level::Debug,
            Target::Maintainer,
            &|| {
                let from = previous.map_or_else(|| "none".to_string(), |c| c.to_string());
                format!("Migrating data for consent change {} -> {}", from, new)
            },
            None,
        );
        operation.run(
            self.file_mover.as_ref(),
            self.logger.as_ref(),
            self.retry.max_attempts,
            self.retry.delay,
        );
    }
}
