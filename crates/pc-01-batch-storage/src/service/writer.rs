//! Writers handed to `write_current_batch` callbacks.

use crate::adapters::file::ext;
use crate::domain::config::PersistenceConfig;
use crate::domain::errors::PersistenceError;
use crate::domain::tlv::HEADER_SIZE;
use crate::ports::inbound::EventBatchWriter;
use crate::ports::outbound::{BatchFileReaderWriter, FileOrchestrator, FileReaderWriter};
use shared_types::{InternalLogger, Level, RawBatchEvent, Target};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// The batch a writer appends to, resolved on first use.
#[derive(Debug)]
struct BatchTarget {
    file: PathBuf,
    metadata: Option<PathBuf>,
}

/// Appends to the writable batch of one orchestrator.
///
/// The batch is picked once per callback: by the first `write` for the size
/// of its event, or by `current_metadata` for the largest allowed event.
pub(crate) struct FileEventBatchWriter<'a> {
    orchestrator: &'a dyn FileOrchestrator,
    batch_rw: &'a dyn BatchFileReaderWriter,
    metadata_rw: &'a dyn FileReaderWriter,
    config: &'a PersistenceConfig,
    logger: &'a dyn InternalLogger,
    target: OnceCell<Option<BatchTarget>>,
}

impl<'a> FileEventBatchWriter<'a> {
    pub(crate) fn new(
        orchestrator: &'a dyn FileOrchestrator,
        batch_rw: &'a dyn BatchFileReaderWriter,
        metadata_rw: &'a dyn FileReaderWriter,
        config: &'a PersistenceConfig,
        logger: &'a dyn InternalLogger,
    ) -> Self {
        Self {
            orchestrator,
            batch_rw,
            metadata_rw,
            config,
            logger,
            target: OnceCell::new(),
        }
    }

    fn target(&self, min_remaining_capacity: u64) -> Option<&BatchTarget> {
        self.target
            .get_or_init(|| {
                let file = self.orchestrator.writable_file(min_remaining_capacity)?;
                let metadata = self.orchestrator.metadata_file(&file);
                Some(BatchTarget { file, metadata })
            })
            .as_ref()
    }

    fn write_metadata(&self, metadata_file: &Path, metadata: &[u8]) {
        if !self.metadata_rw.write_data(metadata_file, metadata, false) {
            self.logger.log_to(
                Level::Warn,
                Target::Maintainer,
                &|| format!("Unable to write metadata file: {}", metadata_file.display()),
                None,
            );
        }
    }
}

impl EventBatchWriter for FileEventBatchWriter<'_> {
    fn current_metadata(&self) -> Option<Vec<u8>> {
        let metadata_file = self.target(self.config.max_item_size)?.metadata.as_ref()?;
        read_metadata(metadata_file, self.metadata_rw, self.logger)
    }

    fn write(&self, event: &RawBatchEvent, batch_metadata: Option<&[u8]>) -> bool {
        if event.is_empty() {
            return true;
        }

        let size = event.data.len();
        if size as u64 > self.config.max_item_size {
            let err = PersistenceError::ItemTooLarge {
                size,
                max_size: self.config.max_item_size,
            };
            self.logger
                .log_to(Level::Error, Target::User, &|| err.to_string(), None);
            return false;
        }

        let framed_size = (2 * HEADER_SIZE + event.metadata.len() + size) as u64;
        let Some(target) = self.target(framed_size) else {
            return false;
        };

        let written = self.batch_rw.write_event(&target.file, event, true);
        if written {
            if let (Some(metadata), Some(metadata_file)) = (
                batch_metadata.filter(|m| !m.is_empty()),
                target.metadata.as_deref(),
            ) {
                self.write_metadata(metadata_file, metadata);
            }
        }
        written
    }
}

/// Writer used when consent is refused: reports success, keeps nothing.
pub(crate) struct NoOpEventBatchWriter;

impl EventBatchWriter for NoOpEventBatchWriter {
    fn current_metadata(&self) -> Option<Vec<u8>> {
        None
    }

    fn write(&self, _event: &RawBatchEvent, _batch_metadata: Option<&[u8]>) -> bool {
        true
    }
}

/// Content of a metadata file; `None` when missing or empty.
pub(crate) fn read_metadata(
    metadata_file: &Path,
    metadata_rw: &dyn FileReaderWriter,
    logger: &dyn InternalLogger,
) -> Option<Vec<u8>> {
    if !ext::exists_safe(metadata_file, logger) {
        return None;
    }
    let bytes = metadata_rw.read_data(metadata_file);
    (!bytes.is_empty()).then_some(bytes)
}
