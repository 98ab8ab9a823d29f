//! # Storage Scenarios
//!
//! End-to-end behavior of `ConsentAwareStorage` over the real file system
//! adapters, driven by a manual clock.

pub mod concurrency;
pub mod consent;
pub mod lifecycle;
pub mod recovery;
