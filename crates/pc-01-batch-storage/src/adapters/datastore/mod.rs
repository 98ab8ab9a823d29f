//! # Keyed Datastore
//!
//! Small versioned values persisted per feature, one file per key, as two
//! TLV blocks:
//!
//! ```text
//! +- VERSION_CODE -+- 4 -+- i32 BE -+- DATA -+- n -+- JSON -+
//! ```
//!
//! Files live under `<storage_dir>/<feature>/datastore_v0/<key>`.

mod handler;


pub use handler::{DataStoreContent, DataStoreFileHandler, DataStoreRead, DATASTORE_FOLDER};
