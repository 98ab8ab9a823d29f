//! # Pulse Benchmarks
//!
//! Criterion bodies, registered by `benches/storage_benchmarks.rs`.
