//! Advisory lock guarding a package cache for the duration of a run.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Lock file path for a package directory: a `.lock` sibling, so full
/// cleanup of the package directory never deletes a held lock.
pub fn lock_path_for(packages_dir: &Path) -> PathBuf {
    let mut name = packages_dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "packages".into());
    name.push(".lock");
    packages_dir.with_file_name(name)
}

/// A guard that holds an exclusive lock on a package cache.
/// Lock is released when dropped.
#[derive(Debug)]
pub struct CacheLock {
    file: File,
    path: PathBuf,
}

impl CacheLock {
    /// Take the lock without blocking; fails with [`Error::CacheLocked`]
    /// if another run holds it.
    pub fn acquire(packages_dir: &Path) -> Result<Self> {
        let path = lock_path_for(packages_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file, path }),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(Error::CacheLocked {
                path: packages_dir.to_path_buf(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_path_is_sibling() {
        let path = lock_path_for(Path::new("/framework/_pio"));
        assert_eq!(path, PathBuf::from("/framework/_pio.lock"));
    }

    #[test]
    fn test_acquire_creates_lock_file() {
        let dir = tempdir().unwrap();
        let packages = dir.path().join("_pio");

        let lock = CacheLock::acquire(&packages).unwrap();
        assert!(lock.path().exists());
        assert!(!packages.exists(), "locking must not create the cache itself");
    }

    #[test]
    fn test_second_acquire_fails_while_held() {
        let dir = tempdir().unwrap();
        let packages = dir.path().join("_pio");

        let _held = CacheLock::acquire(&packages).unwrap();
        let err = CacheLock::acquire(&packages).unwrap_err();
        assert!(matches!(err, Error::CacheLocked { .. }));
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let packages = dir.path().join("_pio");

        drop(CacheLock::acquire(&packages).unwrap());
        assert!(CacheLock::acquire(&packages).is_ok());
    }
}
