//! # Concurrency
//!
//! Many producers, one or more consumers, and consent transitions racing
//! against writes.

#[cfg(test)]
mod tests {
    use crate::fixtures::StorageHarness;
    use parking_lot::Mutex;
    use pc_01_batch_storage::{BatchFileReaderWriter, EventStorage, PlainBatchFileReaderWriter};
    use shared_types::{CapturingLogger, TrackingConsent};
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::{Arc, Barrier};

    fn events_on_disk(dir: &Path) -> usize {
        let rw = PlainBatchFileReaderWriter::new(Arc::new(CapturingLogger::new()));
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0;
        };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.parse::<u64>().is_ok()))
            .map(|p| rw.read_events(&p).len())
            .sum()
    }

    #[test]
    fn test_at_most_one_reader_per_batch() {
        const READERS: usize = 10;
        const BATCHES: usize = 4;
        let h = StorageHarness::new(TrackingConsent::Granted);
        for i in 0..BATCHES {
            h.write(TrackingConsent::Granted, &[i as u8; 32]);
            h.rotate();
        }
        h.age_batches();

        let barrier = Barrier::new(READERS);
        let handed_out = Mutex::new(Vec::new());
        let no_batch = Mutex::new(0usize);
        std::thread::scope(|scope| {
            for _ in 0..READERS {
                scope.spawn(|| {
                    barrier.wait();
                    h.storage.read_next_batch(
                        || *no_batch.lock() += 1,
                        |id, reader| handed_out.lock().push((id, reader.read())),
                    );
                });
            }
        });

        let handed_out = handed_out.into_inner();
        let ids: HashSet<_> = handed_out.iter().map(|(id, _)| id.clone()).collect();
        assert_eq!(handed_out.len(), BATCHES);
        assert_eq!(ids.len(), BATCHES);
        assert_eq!(no_batch.into_inner(), READERS - BATCHES);
        assert_eq!(h.storage.locked_batch_count(), BATCHES);
    }

    #[test]
    fn test_parallel_producers_lose_nothing() {
        const PRODUCERS: usize = 6;
        const EVENTS: usize = 40;
        let h = StorageHarness::new(TrackingConsent::Granted);

        std::thread::scope(|scope| {
            for p in 0..PRODUCERS {
                let h = &h;
                scope.spawn(move || {
                    for e in 0..EVENTS {
                        let payload = format!("producer-{p}-event-{e}");
                        assert!(h.write(TrackingConsent::Granted, payload.as_bytes()));
                    }
                });
            }
        });
        h.age_batches();

        let drained = h.drain();
        let unique: HashSet<_> = drained.iter().cloned().collect();
        assert_eq!(drained.len(), PRODUCERS * EVENTS);
        assert_eq!(unique.len(), PRODUCERS * EVENTS);
    }

    #[test]
    fn test_grant_during_writes_keeps_every_event() {
        const PRODUCERS: usize = 4;
        const EVENTS: usize = 50;
        let h = StorageHarness::new(TrackingConsent::Pending);
        let barrier = Barrier::new(PRODUCERS + 1);

        std::thread::scope(|scope| {
            for p in 0..PRODUCERS {
                let (h, barrier) = (&h, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    for e in 0..EVENTS {
                        let consent = h.storage.consent();
                        let payload = format!("{p}:{e}");
                        assert!(h.write(consent, payload.as_bytes()));
                    }
                });
            }
            scope.spawn(|| {
                barrier.wait();
                h.storage.set_consent(TrackingConsent::Granted);
            });
        });

        let total = events_on_disk(&h.granted_dir()) + events_on_disk(&h.pending_dir());
        assert_eq!(total, PRODUCERS * EVENTS);
    }
}
