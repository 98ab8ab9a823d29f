//! Streaming TLV decoder.

use super::{frame, TlvBlock, TlvBlockType};
use crate::domain::errors::TlvError;
use shared_types::{InternalLogger, Level, Target};
use std::io::Read;

/// Decodes a sequence of TLV blocks from any byte source.
pub struct TlvBlockReader<R> {
    inner: R,
}

impl<R: Read> TlvBlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Decode the next block.
    ///
    /// `Ok(None)` at a clean end of stream.
    pub fn next_block(&mut self) -> Result<Option<TlvBlock>, TlvError> {
        let Some((tag, payload)) = frame::read_frame(&mut self.inner)? else {
            return Ok(None);
        };
        let block_type = TlvBlockType::try_from(tag)?;
        Ok(Some(TlvBlock::new(block_type, payload)))
    }

    /// Decode every block up to the end of the stream or the first corrupt
    /// block, whichever comes first.
    pub fn read_all(mut self, logger: &dyn InternalLogger) -> Vec<TlvBlock> {
        let mut blocks = Vec::new();
        loop {
            match self.next_block() {
                Ok(Some(block)) => blocks.push(block),
                Ok(None) => break,
                Err(e) if e.is_underrun() => {
                    logger.log_to(
                        Level::Debug,
                        Target::Maintainer,
                        &|| format!("TLV stream ended mid-block after {} blocks", blocks.len()),
                        Some(&e),
                    );
                    break;
                }
                Err(e) => {
                    logger.log_to(
                        Level::Error,
                        Target::Maintainer,
                        &|| {
                            format!(
                                "Corrupted TLV stream, stopped after {} valid blocks",
                                blocks.len()
                            )
                        },
                        Some(&e),
                    );
                    break;
                }
            }
        }
        blocks
    }
}

/// Decode all blocks contained in `bytes`.
pub fn decode_all(bytes: &[u8], logger: &dyn InternalLogger) -> Vec<TlvBlock> {
    TlvBlockReader::new(bytes).read_all(logger)
}
