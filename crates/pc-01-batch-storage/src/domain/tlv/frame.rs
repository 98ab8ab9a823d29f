//! Raw `u16 type | i32 length | payload` framing shared by the TLV codec and
//! the batch file format.

use super::HEADER_SIZE;
use crate::domain::errors::TlvError;
use std::io::{self, Read};

/// Append one frame to `out`. `None` if the payload overflows an `i32`.
pub(crate) fn write_frame(out: &mut Vec<u8>, tag: u16, payload: &[u8]) -> Option<()> {
    let len = i32::try_from(payload.len()).ok()?;
    out.extend_from_slice(&tag.to_be_bytes());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(payload);
    Some(())
}

/// Read one frame.
///
/// `Ok(None)` when the source is exhausted exactly at a frame boundary.
pub(crate) fn read_frame<R: Read>(reader: &mut R) -> Result<Option<(u16, Vec<u8>)>, TlvError> {
    let mut header = [0u8; HEADER_SIZE];
    let filled = fill(reader, &mut header)?;
    if filled == 0 {
        return Ok(None);
    }
    if filled < HEADER_SIZE {
        return Err(TlvError::Truncated {
            expected: HEADER_SIZE,
            actual: filled,
        });
    }

    let tag = u16::from_be_bytes([header[0], header[1]]);
    let len = i32::from_be_bytes([header[2], header[3], header[4], header[5]]);
    let expected = usize::try_from(len).map_err(|_| TlvError::InvalidLength(len))?;

    // `take` keeps a corrupted length from triggering a huge allocation.
    let mut payload = Vec::new();
    reader
        .by_ref()
        .take(expected as u64)
        .read_to_end(&mut payload)?;
    if payload.len() < expected {
        return Err(TlvError::Truncated {
            expected,
            actual: payload.len(),
        });
    }

    Ok(Some((tag, payload)))
}

/// Read until `buf` is full or the source ends; returns bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(read)
}
