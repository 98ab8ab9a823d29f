//! Reader handed to `read_next_batch` callbacks.

use super::writer::read_metadata;
use crate::ports::inbound::BatchReader;
use crate::ports::outbound::{BatchFileReaderWriter, FileReaderWriter};
use shared_types::{InternalLogger, RawBatchEvent};
use std::path::PathBuf;

/// Read-only view of one locked batch file.
pub(crate) struct FileBatchReader<'a> {
    pub(crate) file: PathBuf,
    pub(crate) metadata_file: Option<PathBuf>,
    pub(crate) batch_rw: &'a dyn BatchFileReaderWriter,
    pub(crate) metadata_rw: &'a dyn FileReaderWriter,
    pub(crate) logger: &'a dyn InternalLogger,
}

impl BatchReader for FileBatchReader<'_> {
    fn read(&self) -> Vec<RawBatchEvent> {
        self.batch_rw.read_events(&self.file)
    }

    fn current_metadata(&self) -> Option<Vec<u8>> {
        let metadata_file = self.metadata_file.as_deref()?;
        read_metadata(metadata_file, self.metadata_rw, self.logger)
    }
}
