//! # Tracking Consent
//!
//! The end-user's tracking permission, gating whether and where telemetry
//! may be durably stored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracking consent given by the end user.
///
/// The value applies at the moment an event is produced. Already written
/// batches only change bucket through an explicit migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingConsent {
    /// Data is collected and can be uploaded.
    Granted,
    /// Data is collected but held back until consent is decided.
    Pending,
    /// Data is discarded.
    NotGranted,
}

impl TrackingConsent {
    /// All consent values, in declaration order.
    pub const ALL: [TrackingConsent; 3] = [
        TrackingConsent::Granted,
        TrackingConsent::Pending,
        TrackingConsent::NotGranted,
    ];

    /// Whether events produced under this consent are persisted at all.
    pub const fn persists_data(self) -> bool {
        !matches!(self, TrackingConsent::NotGranted)
    }
}

impl fmt::Display for TrackingConsent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingConsent::Granted => write!(f, "GRANTED"),
            TrackingConsent::Pending => write!(f, "PENDING"),
            TrackingConsent::NotGranted => write!(f, "NOT_GRANTED"),
        }
    }
}
