//! # Consent Routing and Migration

#[cfg(test)]
mod tests {
    use crate::fixtures::{fast_config, files_in, StorageHarness};
    use shared_types::TrackingConsent;

    #[test]
    fn test_each_consent_lands_in_its_own_area() {
        let h = StorageHarness::new(TrackingConsent::Pending);

        assert!(h.write(TrackingConsent::Granted, b"g"));
        h.rotate();
        assert!(h.write(TrackingConsent::Pending, b"p"));
        h.rotate();
        assert!(h.write(TrackingConsent::NotGranted, b"n"));

        assert_eq!(files_in(&h.granted_dir()).len(), 1);
        assert_eq!(files_in(&h.pending_dir()).len(), 1);

        h.age_batches();
        assert_eq!(h.drain(), vec![b"g".to_vec()]);
    }

    #[test]
    fn test_pending_event_uploaded_after_grant() {
        let h = StorageHarness::new(TrackingConsent::Pending);
        h.write(TrackingConsent::Pending, b"held back");
        h.age_batches();
        assert!(h.read().is_none());

        h.storage.set_consent(TrackingConsent::Granted);

        assert_eq!(h.drain(), vec![b"held back".to_vec()]);
    }

    #[test]
    fn test_pending_event_discarded_after_refusal() {
        let h = StorageHarness::new(TrackingConsent::Pending);
        h.write(TrackingConsent::Pending, b"never sent");

        h.storage.set_consent(TrackingConsent::NotGranted);
        h.storage.set_consent(TrackingConsent::Granted);
        h.age_batches();

        assert!(h.drain().is_empty());
        assert!(files_in(&h.pending_dir()).is_empty());
    }

    #[test]
    fn test_tracked_consent_writes_follow_transitions() {
        let h = StorageHarness::new(TrackingConsent::Pending);
        let write_tracked = |payload: &[u8]| {
            let mut ok = false;
            h.storage.write_with_tracked_consent(|writer| {
                ok = writer.write(&shared_types::RawBatchEvent::new(payload), None);
            });
            ok
        };

        assert!(write_tracked(b"while pending"));
        h.storage.set_consent(TrackingConsent::Granted);
        h.rotate();
        assert!(write_tracked(b"after grant"));
        h.age_batches();

        assert_eq!(
            h.drain(),
            vec![b"while pending".to_vec(), b"after grant".to_vec()]
        );
    }

    #[test]
    fn test_restart_discards_pending_keeps_granted() {
        let before = StorageHarness::new(TrackingConsent::Pending);
        before.write(TrackingConsent::Granted, b"kept");
        before.write(TrackingConsent::Pending, b"lost");
        assert_eq!(files_in(&before.pending_dir()).len(), 1);

        let after = StorageHarness::in_dir(before.into_dir(), TrackingConsent::Pending, fast_config());

        assert!(files_in(&after.pending_dir()).is_empty());
        after.age_batches();
        assert_eq!(after.drain(), vec![b"kept".to_vec()]);
    }
}
