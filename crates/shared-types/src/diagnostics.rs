//! # Internal Diagnostics
//!
//! The diagnostic channel used by SDK internals instead of propagating
//! errors into the instrumented application.
//!
//! Every call carries a severity, one or more target audiences, a lazily
//! built message and an optional cause.
//!
//! ## Implementations
//!
//! - `TracingLogger`: forwards to `tracing` (production)
//! - `CapturingLogger`: records calls for assertions (tests)

use parking_lot::Mutex;
use std::error::Error;
use std::fmt;

// =============================================================================
// LEVELS AND TARGETS
// =============================================================================

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
}

/// Audience of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The developer integrating the SDK.
    User,
    /// The SDK maintainers.
    Maintainer,
    /// The SDK's own telemetry.
    Telemetry,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::User => write!(f, "user"),
            Target::Maintainer => write!(f, "maintainer"),
            Target::Telemetry => write!(f, "telemetry"),
        }
    }
}

fn join_targets(targets: &[Target]) -> String {
    targets
        .iter()
        .map(Target::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// LOGGER PORT
// =============================================================================

/// Sink for internal diagnostics.
///
/// Implementations must not panic and should only build the message when
/// the diagnostic is actually emitted.
pub trait InternalLogger: Send + Sync {
    /// Emit a diagnostic to the given targets.
    fn log(
        &self,
        level: Level,
        targets: &[Target],
        message: &dyn Fn() -> String,
        error: Option<&dyn Error>,
    );

    /// Emit a diagnostic to a single target.
    fn log_to(
        &self,
        level: Level,
        target: Target,
        message: &dyn Fn() -> String,
        error: Option<&dyn Error>,
    ) {
        self.log(level, &[target], message, error);
    }
}

// =============================================================================
// TRACING ADAPTER
// =============================================================================

/// Forwards diagnostics to the `tracing` facade.
///
/// Message closures are evaluated inside the `tracing` macros, so they only
/// run when the callsite is enabled.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    subsystem: &'static str,
}

impl TracingLogger {
    /// Create a logger tagging every event with `subsystem`.
    pub fn new(subsystem: &'static str) -> Self {
        Self { subsystem }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("pulse")
    }
}

impl InternalLogger for TracingLogger {
    fn log(
        &self,
        level: Level,
        targets: &[Target],
        message: &dyn Fn() -> String,
        error: Option<&dyn Error>,
    ) {
        let subsystem = self.subsystem;
        let cause = error.map(|e| e.to_string()).unwrap_or_default();
        match level {
            Level::Verbose => tracing::trace!(
                subsystem,
                targets = %join_targets(targets),
                cause = %cause,
                "{}",
                message()
            ),
            Level::Debug => tracing::debug!(
                subsystem,
                targets = %join_targets(targets),
                cause = %cause,
                "{}",
                message()
            ),
            Level::Info => tracing::info!(
                subsystem,
                targets = %join_targets(targets),
                cause = %cause,
                "{}",
                message()
            ),
            Level::Warn => tracing::warn!(
                subsystem,
                targets = %join_targets(targets),
                cause = %cause,
                "{}",
                message()
            ),
            Level::Error => tracing::error!(
                subsystem,
                targets = %join_targets(targets),
                cause = %cause,
                "{}",
                message()
            ),
        }
    }
}

// =============================================================================
// CAPTURING ADAPTER
// =============================================================================

/// A diagnostic recorded by `CapturingLogger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub targets: Vec<Target>,
    pub message: String,
    pub cause: Option<String>,
}

/// Records every diagnostic in memory.
///
/// Used by tests to assert on what was reported and to whom.
#[derive(Debug, Default)]
pub struct CapturingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded diagnostics.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Whether a diagnostic at `level`, addressed to `target`, whose message
    /// contains `needle` was recorded.
    pub fn contains(&self, level: Level, target: Target, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|r| r.level == level && r.targets.contains(&target) && r.message.contains(needle))
    }

    /// Number of diagnostics recorded at `level`.
    pub fn count_at(&self, level: Level) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl InternalLogger for CapturingLogger {
    fn log(
        &self,
        level: Level,
        targets: &[Target],
        message: &dyn Fn() -> String,
        error: Option<&dyn Error>,
    ) {
        let record = LogRecord {
            level,
            targets: targets.to_vec(),
            message: message(),
            cause: error.map(|e| e.to_string()),
        };
        self.records.lock().push(record);
    }
}
