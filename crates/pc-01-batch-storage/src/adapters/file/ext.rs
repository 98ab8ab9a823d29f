//! Safe file helpers.
//!
//! Each helper reports failures on the diagnostic channel (ERROR,
//! MAINTAINER) and returns a neutral value instead of an error.

use crate::domain::errors::PersistenceError;
use shared_types::{InternalLogger, Level, Target};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn report(logger: &dyn InternalLogger, op: &str, path: &Path, source: io::Error) {
    let err = PersistenceError::io(path, source);
    logger.log_to(
        Level::Error,
        Target::Maintainer,
        &|| format!("Unable to {} {}", op, path.display()),
        Some(&err),
    );
}

/// Whether `path` exists.
pub fn exists_safe(path: &Path, logger: &dyn InternalLogger) -> bool {
    match path.try_exists() {
        Ok(exists) => exists,
        Err(e) => {
            report(logger, "check existence of", path, e);
            false
        }
    }
}

/// Whether `path` is a directory (false when missing).
pub fn is_dir_safe(path: &Path, logger: &dyn InternalLogger) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_dir(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            report(logger, "stat", path, e);
            false
        }
    }
}

/// Whether `path` can be written to.
pub fn can_write_safe(path: &Path, logger: &dyn InternalLogger) -> bool {
    match fs::metadata(path) {
        Ok(meta) => !meta.permissions().readonly(),
        Err(e) => {
            report(logger, "stat", path, e);
            false
        }
    }
}

/// Size of the file in bytes (0 when unavailable).
pub fn len_safe(path: &Path, logger: &dyn InternalLogger) -> u64 {
    match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => {
            report(logger, "stat", path, e);
            0
        }
    }
}

/// Create `path` and all of its parents.
pub fn mkdirs_safe(path: &Path, logger: &dyn InternalLogger) -> bool {
    match fs::create_dir_all(path) {
        Ok(()) => true,
        Err(e) => {
            report(logger, "create directory", path, e);
            false
        }
    }
}

/// Delete a single file.
pub fn delete_safe(path: &Path, logger: &dyn InternalLogger) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            report(logger, "delete", path, e);
            false
        }
    }
}

/// Rename `from` to `to`.
pub fn rename_safe(from: &Path, to: &Path, logger: &dyn InternalLogger) -> bool {
    match fs::rename(from, to) {
        Ok(()) => true,
        Err(e) => {
            report(logger, &format!("move to {}:", to.display()), from, e);
            false
        }
    }
}

/// Regular files directly inside `dir`, or `None` if it can't be listed.
pub fn list_files_safe(dir: &Path, logger: &dyn InternalLogger) -> Option<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            report(logger, "list", dir, e);
            return None;
        }
    };
    let files = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    Some(files)
}

/// File name as UTF-8, if it is one.
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
