//! Recursive delete and directory moves.

use super::ext;
use crate::ports::outbound::FileMover;
use shared_types::{InternalLogger, Level, Target};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// `FileMover` over the local file system.
pub struct DefaultFileMover {
    logger: Arc<dyn InternalLogger>,
}

impl DefaultFileMover {
    pub fn new(logger: Arc<dyn InternalLogger>) -> Self {
        Self { logger }
    }
}

impl FileMover for DefaultFileMover {
    fn delete(&self, target: &Path) -> bool {
        let logger = self.logger.as_ref();
        if !ext::exists_safe(target, logger) {
            return true;
        }
        let result = if ext::is_dir_safe(target, logger) {
            fs::remove_dir_all(target)
        } else {
            fs::remove_file(target)
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                logger.log_to(
                    Level::Error,
                    Target::Maintainer,
                    &|| format!("Unable to delete file: {}", target.display()),
                    Some(&e),
                );
                false
            }
        }
    }

    fn move_files(&self, src_dir: &Path, dst_dir: &Path) -> bool {
        let logger = self.logger.as_ref();
        if !ext::exists_safe(src_dir, logger) {
            logger.log_to(
                Level::Info,
                Target::Maintainer,
                &|| format!("There were no files to move from {}", src_dir.display()),
                None,
            );
            return true;
        }
        if !ext::is_dir_safe(src_dir, logger) {
            logger.log_to(
                Level::Error,
                Target::Maintainer,
                &|| format!("Unable to move files; file is not a directory: {}", src_dir.display()),
                None,
            );
            return false;
        }
        if !ext::exists_safe(dst_dir, logger) {
            if !ext::mkdirs_safe(dst_dir, logger) {
                return false;
            }
        } else if !ext::is_dir_safe(dst_dir, logger) {
            logger.log_to(
                Level::Error,
                Target::Maintainer,
                &|| format!("Unable to move files; target is not a directory: {}", dst_dir.display()),
                None,
            );
            return false;
        }

        let Some(files) = ext::list_files_safe(src_dir, logger) else {
            return false;
        };
        files.iter().fold(true, |all_moved, file| {
            let moved = match ext::file_name(file) {
                Some(name) => ext::rename_safe(file, &dst_dir.join(name), logger),
                None => false,
            };
            all_moved && moved
        })
    }
}
