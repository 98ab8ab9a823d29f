//! # Domain Layer
//!
//! Pure domain logic for the batch storage subsystem.
//! Nothing here touches the file system.
//!
//! ## Modules
//!
//! - `tlv` - Type-Length-Value block codec (metadata, datastore entries)
//! - `batch_format` - Event framing inside batch files
//! - `batch_id` - Opaque batch handle
//! - `config` - Persistence configuration
//! - `metrics` - Batch closed/deleted metric values
//! - `errors` - Domain error types

pub mod batch_format;
pub mod batch_id;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod tlv;
