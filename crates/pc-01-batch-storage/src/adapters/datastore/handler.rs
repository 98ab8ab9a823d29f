//! `DataStoreFileHandler`: one versioned value per key file.

use crate::adapters::file::ext;
use crate::domain::errors::PersistenceError;
use crate::domain::tlv::{decode_all, TlvBlock, TlvBlockType};
use crate::ports::outbound::FileReaderWriter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{InternalLogger, Level, Target};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Folder of the current datastore format, inside the feature directory.
pub const DATASTORE_FOLDER: &str = "datastore_v0";

/// A value read back from the datastore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStoreContent<T> {
    pub version_code: i32,
    pub data: T,
}

/// Outcome of `DataStoreFileHandler::value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStoreRead<T> {
    /// Nothing stored under the key.
    NoData,
    /// An entry exists but can't be used.
    Failure,
    Success(DataStoreContent<T>),
}

/// File-backed datastore for one feature.
pub struct DataStoreFileHandler {
    dir: PathBuf,
    reader_writer: Arc<dyn FileReaderWriter>,
    logger: Arc<dyn InternalLogger>,
}

impl DataStoreFileHandler {
    pub fn new(
        storage_dir: &Path,
        feature: &str,
        reader_writer: Arc<dyn FileReaderWriter>,
        logger: Arc<dyn InternalLogger>,
    ) -> Self {
        Self {
            dir: storage_dir.join(feature).join(DATASTORE_FOLDER),
            reader_writer,
            logger,
        }
    }

    /// Directory holding the entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `data` under `key`, replacing any previous entry.
    pub fn set_value<T: Serialize>(&self, key: &str, data: &T, version: i32) -> bool {
        let Some(file) = self.entry_file(key) else {
            return false;
        };
        let payload = match serde_json::to_vec(data) {
            Ok(payload) => payload,
            Err(e) => {
                let err = PersistenceError::from(e);
                self.logger.log_to(
                    Level::Error,
                    Target::Maintainer,
                    &|| format!("Failed to serialize data for the datastore entry {key}"),
                    Some(&err),
                );
                return false;
            }
        };

        let version_block = TlvBlock::new(TlvBlockType::VersionCode, version.to_be_bytes().to_vec());
        let data_block = TlvBlock::new(TlvBlockType::Data, payload);
        let (Some(version_bytes), Some(data_bytes)) =
            (version_block.serialize(), data_block.serialize())
        else {
            self.logger.log_to(
                Level::Error,
                Target::Maintainer,
                &|| format!("Unable to encode the datastore entry {key}"),
                None,
            );
            return false;
        };

        if !ext::mkdirs_safe(&self.dir, self.logger.as_ref()) {
            return false;
        }
        let mut bytes = version_bytes;
        bytes.extend_from_slice(&data_bytes);
        self.reader_writer.write_data(&file, &bytes, false)
    }

    /// Read the entry stored under `key`, expecting `version`.
    ///
    /// An entry with another version is deleted.
    pub fn value<T: DeserializeOwned>(&self, key: &str, version: i32) -> DataStoreRead<T> {
        let Some(file) = self.entry_file(key) else {
            return DataStoreRead::Failure;
        };
        if !ext::exists_safe(&file, self.logger.as_ref()) {
            return DataStoreRead::NoData;
        }

        let blocks = decode_all(&self.reader_writer.read_data(&file), self.logger.as_ref());
        let Some(content) = self.map_blocks(key, blocks) else {
            return DataStoreRead::Failure;
        };

        if content.version_code != version {
            self.logger.log_to(
                Level::Error,
                Target::Maintainer,
                &|| {
                    format!(
                        "Invalid version for the datastore entry {key}: expected {version}, found {}",
                        content.version_code
                    )
                },
                None,
            );
            ext::delete_safe(&file, self.logger.as_ref());
            return DataStoreRead::Failure;
        }
        DataStoreRead::Success(content)
    }

    /// Delete the entry stored under `key`. Missing entries count as removed.
    pub fn remove_value(&self, key: &str) -> bool {
        let Some(file) = self.entry_file(key) else {
            return false;
        };
        if !ext::exists_safe(&file, self.logger.as_ref()) {
            return true;
        }
        ext::delete_safe(&file, self.logger.as_ref())
    }

    fn entry_file(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\']);
        if valid {
            Some(self.dir.join(key))
        } else {
            self.logger.log_to(
                Level::Error,
                Target::User,
                &|| format!("Invalid datastore key: {key:?}"),
                None,
            );
            None
        }
    }

    fn map_blocks<T: DeserializeOwned>(
        &self,
        key: &str,
        blocks: Vec<TlvBlock>,
    ) -> Option<DataStoreContent<T>> {
        if blocks.len() != TlvBlockType::ALL.len() {
            self.logger.log_to(
                Level::Error,
                Target::Maintainer,
                &|| format!("Invalid number of blocks in the datastore entry {key}: {}", blocks.len()),
                None,
            );
            return None;
        }

        let mut by_type: HashMap<TlvBlockType, Vec<u8>> = HashMap::new();
        for block in blocks {
            if by_type.contains_key(&block.block_type) {
                self.logger.log_to(
                    Level::Error,
                    Target::Maintainer,
                    &|| format!("{:?} block appears twice in the datastore entry {key}", block.block_type),
                    None,
                );
                return None;
            }
            by_type.insert(block.block_type, block.data);
        }

        let version_bytes: [u8; 4] = by_type
            .get(&TlvBlockType::VersionCode)
            .and_then(|bytes| bytes.as_slice().try_into().ok())?;
        let data = by_type.get(&TlvBlockType::Data)?;
        match serde_json::from_slice(data) {
            Ok(data) => Some(DataStoreContent {
                version_code: i32::from_be_bytes(version_bytes),
                data,
            }),
            Err(e) => {
                let err = PersistenceError::from(e);
                self.logger.log_to(
                    Level::Error,
                    Target::Maintainer,
                    &|| format!("Failed to deserialize the datastore entry {key}"),
                    Some(&err),
                );
                None
            }
        }
    }
}
