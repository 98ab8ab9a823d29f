//! # Batch File Format
//!
//! How events are laid out inside a batch file.
//!
//! Each event is written as a metadata block followed by a data block,
//! using the same `u16 type | i32 length | payload` framing as TLV:
//!
//! ```text
//! +- 0x0001 -+- m -+- metadata -+- 0x0000 -+- n -+- data -+  ... next event
//! ```
//!
//! Unlike TLV, the metadata block is written even when empty so every event
//! is exactly two blocks.

use super::errors::TlvError;
use super::tlv::frame;
use shared_types::RawBatchEvent;
use std::io::Read;

/// Block types inside a batch file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum EventBlockType {
    Event = 0x00,
    Metadata = 0x01,
}

impl EventBlockType {
    pub const fn tag(self) -> u16 {
        self as u16
    }
}

/// Outcome of decoding a batch file.
#[derive(Debug)]
pub struct DecodedEvents {
    /// Events decoded before the end of the stream or the first bad block.
    pub events: Vec<RawBatchEvent>,
    /// Why decoding stopped early, if it did.
    pub stopped_by: Option<TlvError>,
}

impl DecodedEvents {
    pub fn is_complete(&self) -> bool {
        self.stopped_by.is_none()
    }
}

/// Encode one event. `None` if a payload overflows the length prefix.
pub fn encode_event(event: &RawBatchEvent) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(2 * super::tlv::HEADER_SIZE + event.metadata.len() + event.data.len());
    frame::write_frame(&mut out, EventBlockType::Metadata.tag(), &event.metadata)?;
    frame::write_frame(&mut out, EventBlockType::Event.tag(), &event.data)?;
    Some(out)
}

/// Decode every event in `reader`, stopping at the first truncated or
/// mistyped block.
pub fn decode_events<R: Read>(mut reader: R) -> DecodedEvents {
    let mut events = Vec::new();
    loop {
        let metadata = match read_block(&mut reader, EventBlockType::Metadata) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                return DecodedEvents {
                    events,
                    stopped_by: None,
                }
            }
            Err(e) => {
                return DecodedEvents {
                    events,
                    stopped_by: Some(e),
                }
            }
        };
        let data = match read_block(&mut reader, EventBlockType::Event) {
            Ok(Some(data)) => data,
            // A metadata block without its event is a torn write.
            Ok(None) => {
                return DecodedEvents {
                    events,
                    stopped_by: Some(TlvError::Truncated {
                        expected: super::tlv::HEADER_SIZE,
                        actual: 0,
                    }),
                }
            }
            Err(e) => {
                return DecodedEvents {
                    events,
                    stopped_by: Some(e),
                }
            }
        };
        events.push(RawBatchEvent { data, metadata });
    }
}

fn read_block<R: Read>(
    reader: &mut R,
    expected: EventBlockType,
) -> Result<Option<Vec<u8>>, TlvError> {
    match frame::read_frame(reader)? {
        None => Ok(None),
        Some((tag, _)) if tag != expected.tag() => Err(TlvError::UnknownBlockType(tag)),
        Some((_, payload)) => Ok(Some(payload)),
    }
}
