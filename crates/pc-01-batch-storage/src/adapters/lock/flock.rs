//! # File Lock Implementation
//!
//! Uses `fs2` for cross-platform advisory locking (flock on Unix, LockFile
//! on Windows).

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors from directory locking.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Failed to create lock file: {0}")]
    CreateFailed(#[source] io::Error),

    #[error("Storage already in use{} ({})", .pid.map(|p| format!(" by process {p}")).unwrap_or_default(), .path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}

/// Exclusive advisory lock on a storage directory.
///
/// Released on drop; the `LOCK` file itself is left in place.
///
/// ```ignore
/// let lock = RootDirLock::acquire(Path::new("/data/pulse/logs"), Duration::from_secs(1))?;
/// ```
#[derive(Debug)]
pub struct RootDirLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl RootDirLock {
    /// Lock file name
    pub const LOCK_FILE: &'static str = "LOCK";

    /// Acquire the lock on `dir`, creating it if needed.
    ///
    /// Retries with exponential backoff (capped at 500ms) until `timeout`.
    pub fn acquire(dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        std::fs::create_dir_all(dir).map_err(LockError::CreateFailed)?;
        let deadline = Instant::now() + timeout;
        let lock_path = dir.join(Self::LOCK_FILE);
        let mut retry_delay = Duration::from_millis(10);

        loop {
            // Don't truncate: the holder's PID must stay readable.
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .read(true)
                .write(true)
                .open(&lock_path)
                .map_err(LockError::CreateFailed)?;

            if FileExt::try_lock_exclusive(&file).is_ok() {
                let pid = std::process::id();
                let mut locked = file;
                locked.set_len(0).map_err(LockError::WriteFailed)?;
                writeln!(locked, "{}", pid).map_err(LockError::WriteFailed)?;
                locked.sync_all().map_err(LockError::WriteFailed)?;
                return Ok(Self {
                    file: locked,
                    path: lock_path,
                    pid,
                });
            }

            drop(file);
            if Instant::now() >= deadline {
                return Err(LockError::AlreadyLocked {
                    pid: Self::read_existing_pid(&lock_path),
                    path: lock_path,
                });
            }
            std::thread::sleep(retry_delay);
            retry_delay = (retry_delay * 2).min(Duration::from_millis(500));
        }
    }

    /// PID of the process holding the lock
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for RootDirLock {
    fn drop(&mut self) {
        // The file stays: removing it would let a waiter holding the old
        // inode and a newcomer creating a fresh `LOCK` both succeed.
        let _ = FileExt::unlock(&self.file);
    }
}
