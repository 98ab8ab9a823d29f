//! # Ports Layer
//!
//! Hexagonal architecture ports for the batch storage subsystem.
//!
//! - `inbound` - API exposed to telemetry pillars and the uploader
//! - `outbound` - Collaborators the storage depends on (file system, policy)

pub mod inbound;
pub mod outbound;
