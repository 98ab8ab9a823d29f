//! # Raw Batch Events
//!
//! Serialized telemetry events as handed to storage by the pillar writers.

/// One serialized event plus its per-event metadata.
///
/// Storage never interprets either byte sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawBatchEvent {
    /// Serialized event payload.
    pub data: Vec<u8>,
    /// Per-event metadata (may be empty).
    pub metadata: Vec<u8>,
}

impl RawBatchEvent {
    /// Create an event without metadata.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            metadata: Vec::new(),
        }
    }

    /// Create an event with per-event metadata.
    pub fn with_metadata(data: impl Into<Vec<u8>>, metadata: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            metadata: metadata.into(),
        }
    }

    /// Whether the payload is empty (nothing to persist).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for RawBatchEvent {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for RawBatchEvent {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}
