//! # TLV Codec
//!
//! Type-Length-Value blocks used for small auxiliary records (batch
//! metadata, datastore entries).
//!
//! ## Wire Format (big-endian)
//!
//! ```text
//! +-  2 bytes -+-    4 bytes    -+- n bytes -+
//! | block type | payload size n  |  payload  |
//! +------------+-----------------+-----------+
//! ```
//!
//! A block with an empty payload is never written.
//!
//! ## Corruption Policy
//!
//! - Underrun (truncated header or payload): clean end of stream, the
//!   blocks decoded so far are kept. This is what a crash mid-write leaves.
//! - Unknown type tag or negative length: parsing of the stream stops at
//!   that block. Once a tag is unrecognized its length cannot be trusted, so
//!   nothing after it is decoded.

mod block;
pub(crate) mod frame;
mod reader;


pub use block::{TlvBlock, TlvBlockType};
pub use reader::{decode_all, TlvBlockReader};

/// Size of the `type | length` header in bytes.
pub const HEADER_SIZE: usize = 6;
