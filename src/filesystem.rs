//! Filesystem helpers for the package cache.
//!
//! Git marks object files read-only. `std::fs::remove_dir_all` copes with that
//! on Unix but fails on Windows, so [`remove_tree`] retries after clearing the
//! read-only attribute on everything under the directory.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Result of removing a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// Nothing existed at the path.
    Missing,
}

/// Recursively remove `path`, tolerating read-only entries.
pub fn remove_tree(path: &Path) -> io::Result<Removal> {
    if !path.exists() {
        return Ok(Removal::Missing);
    }

    match fs::remove_dir_all(path) {
        Ok(()) => Ok(Removal::Removed),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            make_writable(path)?;
            fs::remove_dir_all(path)?;
            Ok(Removal::Removed)
        }
        Err(e) => Err(e),
    }
}

fn make_writable(root: &Path) -> io::Result<()> {
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::other)?;
        let metadata = entry.metadata().map_err(io::Error::other)?;
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            fs::set_permissions(entry.path(), permissions)?;
        }
    }
    Ok(())
}
