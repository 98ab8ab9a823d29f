//! # Batch Lifecycle
//!
//! `Writable → Readable(unlocked) → Readable(locked) → Deleted | Readable(unlocked)`

#[cfg(test)]
mod tests {
    use crate::fixtures::{files_in, init_test_tracing, StorageHarness};
    use pc_01_batch_storage::EventStorage;
    use shared_types::{Level, RawBatchEvent, Target, TrackingConsent};

    // =========================================================================
    // WRITE → READ → CONFIRM
    // =========================================================================

    #[test]
    fn test_three_events_round_trip_then_gone() {
        init_test_tracing();
        let h = StorageHarness::new(TrackingConsent::Granted);
        let payloads: Vec<Vec<u8>> = (0..3u8).map(|i| vec![i; 100]).collect();
        for payload in &payloads {
            assert!(h.write(TrackingConsent::Granted, payload));
        }
        h.age_batches();

        let (id, events) = h.read().expect("one batch");
        let read: Vec<Vec<u8>> = events.into_iter().map(|e| e.data).collect();
        assert_eq!(read, payloads);

        h.confirm(&id, true);

        let mut no_batch = false;
        h.storage
            .read_next_batch(|| no_batch = true, |_, _| panic!("batch was deleted"));
        assert!(no_batch);
    }

    #[test]
    fn test_retry_later_returns_same_batch() {
        let h = StorageHarness::new(TrackingConsent::Granted);
        h.write(TrackingConsent::Granted, b"retry me");
        h.age_batches();

        let (id, _) = h.read().unwrap();
        h.confirm(&id, false);

        let (again, events) = h.read().unwrap();
        assert_eq!(again, id);
        assert_eq!(events, vec![RawBatchEvent::new(b"retry me".to_vec())]);
    }

    #[test]
    fn test_batches_are_served_oldest_first() {
        let h = StorageHarness::new(TrackingConsent::Granted);
        h.write(TrackingConsent::Granted, b"first");
        h.rotate();
        h.write(TrackingConsent::Granted, b"second");
        h.rotate();
        h.write(TrackingConsent::Granted, b"third");
        h.age_batches();

        assert_eq!(
            h.drain(),
            vec![b"first".to_vec(), b"second".to_vec(), b"third".to_vec()]
        );
    }

    #[test]
    fn test_oversized_event_leaves_batch_untouched() {
        let h = StorageHarness::new(TrackingConsent::Granted);
        h.write(TrackingConsent::Granted, b"small");
        let batch = h.granted_dir().join(files_in(&h.granted_dir())[0].clone());
        let before = std::fs::read(&batch).unwrap();
        let max = h.storage.config().max_item_size as usize;

        assert!(!h.write(TrackingConsent::Granted, &vec![0u8; max + 1]));

        assert_eq!(std::fs::read(&batch).unwrap(), before);
        assert!(h
            .logs
            .contains(Level::Error, Target::User, "Can't write data with size"));
    }

    #[test]
    fn test_batch_metadata_travels_with_batch() {
        let h = StorageHarness::new(TrackingConsent::Granted);
        h.storage.write_current_batch(TrackingConsent::Granted, |writer| {
            let previous = writer.current_metadata().unwrap_or_default();
            let mut next = previous;
            next.extend_from_slice(b"seq=1");
            assert!(writer.write(&RawBatchEvent::new(b"e1".to_vec()), Some(next.as_slice())));
        });
        h.age_batches();

        let mut metadata = None;
        let mut batch_id = None;
        h.storage.read_next_batch(
            || {},
            |id, reader| {
                metadata = reader.current_metadata();
                batch_id = Some(id);
            },
        );
        assert_eq!(metadata.as_deref(), Some(b"seq=1".as_slice()));

        h.confirm(&batch_id.unwrap(), true);
        assert!(files_in(&h.granted_dir()).is_empty());
    }
}
