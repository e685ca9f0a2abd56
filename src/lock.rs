//! File-based locking to prevent concurrent staging/commit runs.
//!
//! The addon directory and the live-root validation step are shared between
//! runs, even runs targeting different addon keys. An flock-style advisory
//! lock around the staging+commit sequence makes a second instance fail
//! fast instead of racing on directory enumeration.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::error::NftdnsError;

/// A guard holding an exclusive lock on the nftdns lock file.
/// The lock is released when the guard is dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
}

impl LockGuard {
    /// Attempt to acquire an exclusive lock.
    /// Returns an error if another instance is already running.
    ///
    /// Uses OpenOptions with create+read+write to avoid a TOCTOU race
    /// between file creation and lock acquisition.
    pub fn acquire(path: &Path) -> Result<Self, NftdnsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| {
                NftdnsError::Lock(format!("Failed to open lock file {}: {e}", path.display()))
            })?;

        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
            NftdnsError::Lock(format!("Failed to set lock file permissions: {e}"))
        })?;

        file.try_lock_exclusive().map_err(|_| {
            NftdnsError::Lock(format!(
                "Another nftdns run is already in progress (lock file: {})",
                path.display()
            ))
        })?;

        Ok(Self { _file: file })
    }
}
