//! Migration operations and their retry loop.

use crate::ports::outbound::FileMover;
use shared_types::{InternalLogger, Level, Target};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// One file-system step of a consent migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOperation {
    /// Delete a directory and everything in it.
    WipeData { dir: Option<PathBuf> },
    /// Move every file of `from` into `to`.
    MoveData {
        from: Option<PathBuf>,
        to: Option<PathBuf>,
    },
    NoOp,
}

impl MigrationOperation {
    /// Execute with up to `max_attempts` tries, sleeping `delay` in between.
    pub fn run(
        &self,
        mover: &dyn FileMover,
        logger: &dyn InternalLogger,
        max_attempts: u32,
        delay: Duration,
    ) -> bool {
        match self {
            MigrationOperation::NoOp => true,
            MigrationOperation::WipeData { dir: None } => {
                logger.log_to(
                    Level::Warn,
                    Target::Maintainer,
                    &|| "Can't wipe data from a null directory".to_string(),
                    None,
                );
                false
            }
            MigrationOperation::WipeData { dir: Some(dir) } => {
                retry_with_delay(max_attempts, delay, logger, "wipe", || mover.delete(dir))
            }
            MigrationOperation::MoveData { from: None, .. } => {
                logger.log_to(
                    Level::Warn,
                    Target::Maintainer,
                    &|| "Can't move data from a null directory".to_string(),
                    None,
                );
                false
            }
            MigrationOperation::MoveData { to: None, .. } => {
                logger.log_to(
                    Level::Warn,
                    Target::Maintainer,
                    &|| "Can't move data to a null directory".to_string(),
                    None,
                );
                false
            }
            MigrationOperation::MoveData {
                from: Some(from),
                to: Some(to),
            } => retry_with_delay(max_attempts, delay, logger, "move", || {
                mover.move_files(from, to)
            }),
        }
    }
}

fn retry_with_delay(
    max_attempts: u32,
    delay: Duration,
    logger: &dyn InternalLogger,
    name: &str,
    mut op: impl FnMut() -> bool,
) -> bool {
    let attempts = max_attempts.max(1);
    for attempt in 1..=attempts {
        if op() {
            return true;
        }
        if attempt < attempts {
            thread::sleep(delay);
        }
    }
    logger.log(
        Level::Error,
        &[Target::Maintainer, Target::Telemetry],
        &|| format!("Unable to {} data after {} attempts", name, attempts),
        None,
    );
    false
}
