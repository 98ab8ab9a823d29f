//! # Batch Identity
//!
//! Opaque handle naming one on-disk batch.

use std::fmt;
use std::path::Path;

/// Correlates "this batch was handed out for reading" with "here is the
/// verdict on it".
///
/// Derived from the batch file's absolute path; two ids are equal iff the
/// path strings are equal. Callers must treat it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchId {
    id: String,
}

impl BatchId {
    /// Derive the id of a batch file.
    pub fn from_file(file: &Path) -> Self {
        let absolute = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());
        Self {
            id: absolute.to_string_lossy().into_owned(),
        }
    }

    /// Whether this id names `file`.
    pub fn matches_file(&self, file: &Path) -> bool {
        *self == BatchId::from_file(file)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
