//! # Recovery
//!
//! Damaged batches, disk pressure, obsolete data and the keyed datastore.

#[cfg(test)]
mod tests {
    use crate::fixtures::{fast_config, files_in, StorageHarness};
    use pc_01_batch_storage::domain::batch_format::encode_event;
    use pc_01_batch_storage::domain::tlv::decode_all;
    use pc_01_batch_storage::{
        BatchFileReaderWriter, DataStoreContent, DataStoreFileHandler, DataStoreRead,
        PlainBatchFileReaderWriter, PlainFileReaderWriter, TlvBlock, TlvBlockType,
    };
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};
    use shared_types::{CapturingLogger, Level, RawBatchEvent, Target, TrackingConsent};
    use std::fs::OpenOptions;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    // =========================================================================
    // DAMAGED BATCHES
    // =========================================================================

    #[test]
    fn test_crash_mid_write_keeps_complete_events() {
        let h = StorageHarness::new(TrackingConsent::Granted);
        h.write(TrackingConsent::Granted, b"complete");
        h.write(TrackingConsent::Granted, b"torn by a crash");
        let batch = h.granted_dir().join(&files_in(&h.granted_dir())[0]);
        let len = std::fs::metadata(&batch).unwrap().len();
        OpenOptions::new()
            .write(true)
            .open(&batch)
            .unwrap()
            .set_len(len - 4)
            .unwrap();
        h.age_batches();

        let (_, events) = h.read().unwrap();

        assert_eq!(events, vec![RawBatchEvent::new(b"complete".to_vec())]);
        assert!(h.logs.contains(Level::Error, Target::User, "not all data read"));
    }

    #[test]
    fn test_garbage_batch_can_still_be_discarded() {
        let h = StorageHarness::new(TrackingConsent::Granted);
        std::fs::create_dir_all(h.granted_dir()).unwrap();
        std::fs::write(h.granted_dir().join("1699999990000"), b"\xff\xff garbage").unwrap();

        let (id, events) = h.read().unwrap();
        assert!(events.is_empty());

        h.confirm(&id, true);
        assert!(files_in(&h.granted_dir()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_truncated_batch_yields_complete_prefix(
            payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 1..8),
            cut in 1usize..64,
        ) {
            let dir = TempDir::new().unwrap();
            let file = dir.path().join("1000");
            let encoded: Vec<Vec<u8>> = payloads
                .iter()
                .map(|p| encode_event(&RawBatchEvent::new(p.clone())).unwrap())
                .collect();
            let mut bytes: Vec<u8> = encoded.concat();
            let last_len = encoded.last().unwrap().len();
            let cut = cut.min(last_len - 1).max(1);
            bytes.truncate(bytes.len() - cut);
            std::fs::write(&file, &bytes).unwrap();

            let rw = PlainBatchFileReaderWriter::new(Arc::new(CapturingLogger::new()));
            let events = rw.read_events(&file);

            let expected: Vec<RawBatchEvent> = payloads[..payloads.len() - 1]
                .iter()
                .map(|p| RawBatchEvent::new(p.clone()))
                .collect();
            prop_assert_eq!(events, expected);
        }
    }

    #[test]
    fn test_metadata_tlv_with_partial_trailing_record() {
        let logger = CapturingLogger::new();
        let mut bytes = TlvBlock::new(TlvBlockType::Data, b"session=42".to_vec())
            .serialize()
            .unwrap();
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]);

        let blocks = decode_all(&bytes, &logger);

        assert_eq!(blocks, vec![TlvBlock::new(TlvBlockType::Data, b"session=42".to_vec())]);
        assert_eq!(logger.count_at(Level::Error), 0);
    }

    // =========================================================================
    // DISK PRESSURE AND AGE
    // =========================================================================

    #[test]
    fn test_disk_budget_evicts_oldest_batches() {
        let config = fast_config()
            .with_max_disk_space(300)
            .with_cleanup_frequency_threshold(Duration::ZERO);
        let h = StorageHarness::with_config(TrackingConsent::Granted, config);
        for i in 1..=5u8 {
            h.write(TrackingConsent::Granted, &[i; 100]);
            h.rotate();
        }
        h.age_batches();

        let remaining: Vec<u8> = h.drain().into_iter().map(|payload| payload[0]).collect();

        assert_eq!(remaining, vec![3, 4, 5]);
        assert!(h
            .logs
            .contains(Level::Error, Target::Maintainer, "Too much disk space used"));
    }

    #[test]
    fn test_obsolete_batches_are_never_uploaded() {
        let config = fast_config().with_old_file_threshold(Duration::from_secs(10));
        let h = StorageHarness::with_config(TrackingConsent::Granted, config);
        h.write(TrackingConsent::Granted, b"too old");

        h.clock.advance(Duration::from_secs(11));

        assert!(h.read().is_none());
        assert!(files_in(&h.granted_dir()).is_empty());
    }

    // =========================================================================
    // DATASTORE
    // =========================================================================

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct LastView {
        view_id: String,
        timestamp_ms: u64,
    }

    fn datastore(dir: &TempDir) -> DataStoreFileHandler {
        let logger = Arc::new(CapturingLogger::new());
        DataStoreFileHandler::new(
            dir.path(),
            "rum",
            Arc::new(PlainFileReaderWriter::new(logger.clone())),
            logger,
        )
    }

    #[test]
    fn test_datastore_survives_restart() {
        let dir = TempDir::new().unwrap();
        let view = LastView {
            view_id: "home".to_string(),
            timestamp_ms: 1_700_000_000_000,
        };
        assert!(datastore(&dir).set_value("last_view", &view, 2));

        let read = datastore(&dir).value::<LastView>("last_view", 2);

        assert_eq!(
            read,
            DataStoreRead::Success(DataStoreContent {
                version_code: 2,
                data: view
            })
        );
    }

    #[test]
    fn test_datastore_schema_bump_drops_entry() {
        let dir = TempDir::new().unwrap();
        datastore(&dir).set_value("counter", &5u64, 1);

        assert_eq!(datastore(&dir).value::<u64>("counter", 2), DataStoreRead::Failure);
        assert_eq!(datastore(&dir).value::<u64>("counter", 1), DataStoreRead::NoData);
    }
}
