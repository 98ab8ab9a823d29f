//! One-shot verdict on a locked batch.

use super::ConsentAwareStorage;
use crate::ports::inbound::BatchConfirmation;
use std::path::PathBuf;

pub(crate) struct FileBatchConfirmation<'a> {
    pub(crate) storage: &'a ConsentAwareStorage,
    pub(crate) file: PathBuf,
}

impl BatchConfirmation for FileBatchConfirmation<'_> {
    fn mark_as_read(self: Box<Self>, delete: bool) {
        if delete {
            self.storage.delete_confirmed_batch(&self.file);
        }
        self.storage.unlock(&self.file);
    }
}
