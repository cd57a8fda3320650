//! Advisory flock(2) guard held across every store mutation.

use crate::error::{StoreError, StoreResult};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// An exclusive lock on the roster. Released on drop (closing the file
/// releases the flock), so every early return from a mutation unlocks.
pub struct FileLock {
    _file: File,
}

impl FileLock {
    /// Acquire an exclusive lock, blocking until available.
    pub fn exclusive(path: &Path) -> StoreResult<Self> {
        let file = open_lock_file(path)?;
        file.lock_exclusive()
            .map_err(|e| StoreError::io("acquire lock", path, e))?;
        Ok(Self { _file: file })
    }

    /// Try to acquire an exclusive lock without blocking.
    /// Returns `Ok(None)` if another holder has it.
    pub fn try_exclusive(path: &Path) -> StoreResult<Option<Self>> {
        let file = open_lock_file(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { _file: file })),
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            // fs2 on Linux may report EAGAIN as Other
            Err(ref e) if e.raw_os_error() == Some(11) => Ok(None),
            Err(e) => Err(StoreError::io("try lock", path, e)),
        }
    }
}

fn open_lock_file(path: &Path) -> StoreResult<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|e| StoreError::io("open lock file", path, e))
}
