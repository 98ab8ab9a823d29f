//! # File System Adapters
//!
//! - `ext` - File helpers that log instead of failing
//! - `reader_writer` - Raw and event-framed file I/O
//! - `mover` - Recursive delete and directory moves

pub mod ext;
mod mover;
mod reader_writer;


pub use mover::DefaultFileMover;
pub use reader_writer::{PlainBatchFileReaderWriter, PlainFileReaderWriter};
