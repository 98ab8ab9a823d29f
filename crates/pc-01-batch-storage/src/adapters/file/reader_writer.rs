//! Raw and event-framed file I/O.

use super::ext;
use crate::domain::batch_format::{decode_events, encode_event};
use crate::ports::outbound::{BatchFileReaderWriter, FileReaderWriter};
use shared_types::{InternalLogger, Level, RawBatchEvent, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use std::sync::Arc;

fn write_bytes(file: &Path, bytes: &[u8], append: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    // One write_all per record: appends from concurrent writers never
    // interleave partial frames.
    let mut handle = options.open(file)?;
    handle.write_all(bytes)
}

// =============================================================================
// RAW BYTES
// =============================================================================

/// Reads and writes whole files as raw bytes.
pub struct PlainFileReaderWriter {
    logger: Arc<dyn InternalLogger>,
}

impl PlainFileReaderWriter {
    pub fn new(logger: Arc<dyn InternalLogger>) -> Self {
        Self { logger }
    }
}

impl FileReaderWriter for PlainFileReaderWriter {
    fn write_data(&self, file: &Path, data: &[u8], append: bool) -> bool {
        match write_bytes(file, data, append) {
            Ok(()) => true,
            Err(e) => {
                self.logger.log(
                    Level::Error,
                    &[Target::Maintainer, Target::Telemetry],
                    &|| format!("Unable to write data to file: {}", file.display()),
                    Some(&e),
                );
                false
            }
        }
    }

    fn read_data(&self, file: &Path) -> Vec<u8> {
        if !ext::exists_safe(file, self.logger.as_ref()) {
            self.logger.log(
                Level::Error,
                &[Target::Maintainer, Target::Telemetry],
                &|| format!("File {} does not exist", file.display()),
                None,
            );
            return Vec::new();
        }
        match std::fs::read(file) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.logger.log(
                    Level::Error,
                    &[Target::Maintainer, Target::Telemetry],
                    &|| format!("Unable to read data from file: {}", file.display()),
                    Some(&e),
                );
                Vec::new()
            }
        }
    }
}

// =============================================================================
// FRAMED EVENTS
// =============================================================================

/// Appends and reads `RawBatchEvent`s using the batch file framing.
pub struct PlainBatchFileReaderWriter {
    logger: Arc<dyn InternalLogger>,
}

impl PlainBatchFileReaderWriter {
    pub fn new(logger: Arc<dyn InternalLogger>) -> Self {
        Self { logger }
    }

    fn open(&self, file: &Path) -> Option<impl Read> {
        match File::open(file) {
            Ok(handle) => Some(BufReader::new(handle)),
            Err(e) => {
                self.logger.log(
                    Level::Error,
                    &[Target::Maintainer, Target::Telemetry],
                    &|| format!("Unable to read data from file: {}", file.display()),
                    Some(&e),
                );
                None
            }
        }
    }
}

impl BatchFileReaderWriter for PlainBatchFileReaderWriter {
    fn write_event(&self, file: &Path, event: &RawBatchEvent, append: bool) -> bool {
        let Some(bytes) = encode_event(event) else {
            self.logger.log_to(
                Level::Error,
                Target::Maintainer,
                &|| format!("Event of {} bytes can't be framed", event.data.len()),
                None,
            );
            return false;
        };
        match write_bytes(file, &bytes, append) {
            Ok(()) => true,
            Err(e) => {
                self.logger.log(
                    Level::Error,
                    &[Target::Maintainer, Target::Telemetry],
                    &|| format!("Unable to write data to file: {}", file.display()),
                    Some(&e),
                );
                false
            }
        }
    }

    fn read_events(&self, file: &Path) -> Vec<RawBatchEvent> {
        let Some(reader) = self.open(file) else {
            return Vec::new();
        };
        let decoded = decode_events(reader);
        if let Some(cause) = &decoded.stopped_by {
            self.logger.log(
                Level::Error,
                &[Target::User, Target::Telemetry],
                &|| {
                    format!(
                        "Unable to read all data from file {}: not all data read, kept {} events",
                        file.display(),
                        decoded.events.len()
                    )
                },
                Some(cause),
            );
        }
        decoded.events
    }
}
