//! # Domain Errors
//!
//! Error types for the batch storage subsystem.
//!
//! ## Design Principles
//!
//! - Errors never cross the storage boundary: public operations turn them
//!   into a diagnostic plus a plain success/failure result
//! - Internal helpers use `Result` and `?` like any other Rust code

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding framed blocks (TLV or batch events).
#[derive(Debug, Error)]
pub enum TlvError {
    /// The type tag is not a registered value.
    #[error("Unknown block type: {0:#06x}")]
    UnknownBlockType(u16),

    /// The length prefix is negative.
    #[error("Invalid block length: {0}")]
    InvalidLength(i32),

    /// Fewer bytes were available than the header announced.
    #[error("Truncated block: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The underlying reader failed.
    #[error("Block stream I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TlvError {
    /// Underruns are the normal signature of a crash mid-write.
    pub fn is_underrun(&self) -> bool {
        matches!(self, TlvError::Truncated { .. })
    }
}

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Event larger than the configured maximum item size.
    #[error("Can't write data with size {size} (max item size is {max_size})")]
    ItemTooLarge { size: usize, max_size: u64 },

    /// File system failure on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A path expected to be a directory is something else.
    #[error("The provided root file is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Datastore value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage directory is held by another process.
    #[error("Storage directory locked: {0}")]
    Locked(String),
}

impl PersistenceError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }
}
