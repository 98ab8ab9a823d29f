//! # Batch File Orchestration
//!
//! Time-named batch files in one directory, with size, age, item count and
//! disk budget rotation.

mod batch;


pub use batch::{BatchFileOrchestrator, METADATA_SUFFIX};
