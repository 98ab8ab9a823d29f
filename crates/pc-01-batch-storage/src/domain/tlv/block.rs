//! TLV block and its registered types.

use super::frame;
use crate::domain::errors::TlvError;

/// Registered TLV block types.
///
/// Closed set: an unknown tag is a decode error, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TlvBlockType {
    VersionCode = 0x00,
    Data = 0x01,
}

impl TlvBlockType {
    /// All registered block types.
    pub const ALL: [TlvBlockType; 2] = [TlvBlockType::VersionCode, TlvBlockType::Data];

    /// The 16-bit wire tag.
    pub const fn tag(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for TlvBlockType {
    type Error = TlvError;

    fn try_from(tag: u16) -> Result<Self, Self::Error> {
        match tag {
            0x00 => Ok(TlvBlockType::VersionCode),
            0x01 => Ok(TlvBlockType::Data),
            other => Err(TlvError::UnknownBlockType(other)),
        }
    }
}

/// One typed block. Owns a private copy of its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvBlock {
    pub block_type: TlvBlockType,
    pub data: Vec<u8>,
}

impl TlvBlock {
    pub fn new(block_type: TlvBlockType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            block_type,
            data: data.into(),
        }
    }

    /// Encode the block.
    ///
    /// Returns `None` when there is nothing to persist: an empty payload, or
    /// one too large for the signed 32-bit length prefix.
    pub fn serialize(&self) -> Option<Vec<u8>> {
        if self.data.is_empty() {
            return None;
        }
        let mut out = Vec::with_capacity(super::HEADER_SIZE + self.data.len());
        frame::write_frame(&mut out, self.block_type.tag(), &self.data)?;
        Some(out)
    }
}
