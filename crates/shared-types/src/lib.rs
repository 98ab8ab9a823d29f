//! # Shared Types Crate
//!
//! Types shared by every telemetry pillar (logs, traces, RUM, session replay)
//! and the storage subsystem underneath them.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: consent and event types are defined once here.
//! - **Never crash the host**: the diagnostic channel replaces error
//!   propagation at subsystem boundaries.

pub mod consent;
pub mod diagnostics;
pub mod events;

pub use consent::TrackingConsent;
pub use diagnostics::{CapturingLogger, InternalLogger, Level, LogRecord, Target, TracingLogger};
pub use events::RawBatchEvent;
