//! Default values for west-fetch configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// Manifest file name looked up in the current directory.
pub const MANIFEST_FILE: &str = "west.yml";

/// Package cache directory name, created next to the manifest.
pub const PACKAGES_DIR: &str = "_pio";

/// State file name inside the package cache.
pub const STATE_FILE: &str = "state.json";

/// Returns the default manifest path.
///
/// This can be overridden by the `--manifest` CLI flag or the
/// `WEST_FETCH_MANIFEST` environment variable.
pub fn default_manifest_path() -> PathBuf {
    PathBuf::from(MANIFEST_FILE)
}

/// Returns the default package directory for a manifest: `_pio` in the
/// directory containing the manifest.
///
/// This can be overridden by the `--packages-dir` CLI flag or the
/// `WEST_FETCH_PACKAGES` environment variable.
pub fn default_packages_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(PACKAGES_DIR)
}

/// Returns the state file path for a package directory.
pub fn state_file(packages_dir: &Path) -> PathBuf {
    packages_dir.join(STATE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_path() {
        assert_eq!(default_manifest_path(), PathBuf::from("west.yml"));
    }

    #[test]
    fn test_packages_dir_next_to_manifest() {
        let dir = default_packages_dir(Path::new("/opt/framework/west.yml"));
        assert_eq!(dir, PathBuf::from("/opt/framework/_pio"));
    }

    #[test]
    fn test_packages_dir_for_bare_file_name() {
        let dir = default_packages_dir(Path::new("west.yml"));
        assert_eq!(dir, PathBuf::from("./_pio"));
    }

    #[test]
    fn test_state_file_inside_packages_dir() {
        assert_eq!(
            state_file(Path::new("/opt/framework/_pio")),
            PathBuf::from("/opt/framework/_pio/state.json")
        );
    }
}
