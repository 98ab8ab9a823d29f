//! # Pulse Storage Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | pc-01-tlv | Block serialization and stream decoding |
//! | pc-01-write | Appends through the consent-aware storage |
//! | pc-01-read | Locking, reading and deleting a batch |

use criterion::{criterion_group, criterion_main};
use pc_tests::benchmarks::pc_01_batch_storage::{
    bench_read_and_confirm, bench_tlv_codec, bench_write_events,
};

criterion_group!(
    storage_benches,
    bench_tlv_codec,
    bench_write_events,
    bench_read_and_confirm
);
criterion_main!(storage_benches);
