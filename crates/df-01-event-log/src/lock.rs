//! # Store Lock
//!
//! Process-exclusive lock on the event-store data directory, using `fs2`
//! (flock on Unix, LockFile on Windows). Acquired on service startup,
//! released on drop (RAII).

use crate::store::EventLogError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exclusive lock on a data directory.
///
/// Two filing nodes pointed at the same directory would violate the
/// one-live-entity-per-id guarantee; the lock turns that misconfiguration
/// into a startup error.
pub struct StoreLock {
    /// The lock file handle (kept open to maintain the lock).
    _file: File,
    /// Path to the lock file.
    path: PathBuf,
}

impl StoreLock {
    /// Lock file name.
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire an exclusive lock on the data directory.
    ///
    /// # Errors
    ///
    /// Returns [`EventLogError::Locked`] if another process holds the lock.
    pub fn acquire(data_dir: &Path) -> Result<Self, EventLogError> {
        std::fs::create_dir_all(data_dir).map_err(EventLogError::io)?;
        let path = data_dir.join(Self::LOCK_FILE);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(EventLogError::io)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                let mut locked = file;
                // Best effort: record our pid for diagnostics.
                let _ = locked.set_len(0);
                let _ = writeln!(locked, "{}", std::process::id());
                let _ = locked.sync_all();
                Ok(Self {
                    _file: locked,
                    path,
                })
            }
            Err(_) => Err(EventLogError::Locked {
                pid: Self::read_existing_pid(&path),
            }),
        }
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read pid from an existing lock file (for error messages).
    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self._file);
        let _ = std::fs::remove_file(&self.path);
    }
}
