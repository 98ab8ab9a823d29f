//! # Storage Directory Locking
//!
//! Keeps a second process from opening the same feature storage.
//! In-process exclusion of readers is the locked-batch set; this lock only
//! guards against another process.

mod flock;


pub use flock::{LockError, RootDirLock};
