//! `EventStorage` implementation.

use super::confirmation::FileBatchConfirmation;
use super::reader::FileBatchReader;
use super::writer::{FileEventBatchWriter, NoOpEventBatchWriter};
use super::ConsentAwareStorage;
use crate::domain::batch_id::BatchId;
use crate::ports::inbound::{BatchConfirmation, BatchReader, EventBatchWriter, EventStorage};
use shared_types::{Level, Target, TrackingConsent};

impl ConsentAwareStorage {
    /// Like `write_current_batch`, under the storage's current consent.
    pub fn write_with_tracked_consent<F>(&self, callback: F)
    where
        F: FnOnce(&dyn EventBatchWriter),
    {
        let consent = self.consent.read();
        self.write_under(*consent, callback);
    }

    /// Caller holds the consent lock.
    fn write_under<F>(&self, consent: TrackingConsent, callback: F)
    where
        F: FnOnce(&dyn EventBatchWriter),
    {
        match self.orchestrator_for(consent) {
            None => callback(&NoOpEventBatchWriter),
            Some(orchestrator) => {
                let writer = FileEventBatchWriter::new(
                    orchestrator,
                    self.batch_rw.as_ref(),
                    self.metadata_rw.as_ref(),
                    &self.config,
                    self.logger.as_ref(),
                );
                callback(&writer);
            }
        }
    }
}

impl EventStorage for ConsentAwareStorage {
    fn write_current_batch<F>(&self, consent: TrackingConsent, callback: F)
    where
        F: FnOnce(&dyn EventBatchWriter),
    {
        let _transition_guard = self.consent.read();
        self.write_under(consent, callback);
    }

    fn read_next_batch<N, B>(&self, on_no_batch: N, on_batch: B)
    where
        N: FnOnce(),
        B: FnOnce(BatchId, &dyn BatchReader),
    {
        let file = {
            let mut locked = self.locked_batches.lock();
            let file = self.granted.readable_file(&locked);
            if let Some(file) = &file {
                locked.insert(file.clone());
            }
            file
        };

        let Some(file) = file else {
            on_no_batch();
            return;
        };

        let batch_id = BatchId::from_file(&file);
        let reader = FileBatchReader {
            metadata_file: self.granted.metadata_file(&file),
            file,
            batch_rw: self.batch_rw.as_ref(),
            metadata_rw: self.metadata_rw.as_ref(),
            logger: self.logger.as_ref(),
        };
        on_batch(batch_id, &reader);
    }

    fn confirm_batch_read<F>(&self, batch_id: &BatchId, callback: F)
    where
        F: FnOnce(Box<dyn BatchConfirmation + '_>),
    {
        let file = self
            .locked_batches
            .lock()
            .iter()
            .find(|file| batch_id.matches_file(file))
            .cloned();

        let Some(file) = file else {
            self.logger.log_to(
                Level::Debug,
                Target::Maintainer,
                &|| format!("No locked batch for id {batch_id}, confirmation ignored"),
                None,
            );
            return;
        };

        callback(Box::new(FileBatchConfirmation {
            storage: self,
            file,
        }));
    }

    fn drop_all(&self) {
        let _transition_guard = self.consent.write();

        let locked: Vec<_> = self.locked_batches.lock().drain().collect();
        for file in &locked {
            self.delete_batch(file);
        }

        for orchestrator in [self.pending.as_ref(), self.granted.as_ref()] {
            for file in orchestrator.all_files() {
                self.delete_batch_of(orchestrator, &file);
            }
        }
    }
}
