//! # Pulse Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Storage harness over a temp dir and a manual clock
//! ├── integration/      # End-to-end storage scenarios
//! │   ├── lifecycle.rs  # write → read → confirm
//! │   ├── consent.rs    # routing and migration
//! │   ├── concurrency.rs
//! │   └── recovery.rs   # torn files, disk budget, datastore
//! └── benchmarks/       # Criterion bodies used by benches/
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! RUST_LOG=debug cargo test -p pc-tests integration::consent
//! cargo bench -p pc-tests
//! ```

pub mod benchmarks;
pub mod fixtures;
pub mod integration;
