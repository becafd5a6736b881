//! # State Store
//!
//! Persists the record of which project revisions were installed by the last
//! successful run. The record is a flat JSON object mapping project names to
//! revisions:
//!
//! ```json
//! {
//!   "cmsis": "4b96cbb174678dcd3ca86e11e1f24bc5f8726da0",
//!   "hal_st": "v1.2.0"
//! }
//! ```
//!
//! A missing state file means "first run" and is not an error. A file that
//! exists but does not parse is reported as [`Error::StateCorruption`]; it is
//! never treated as a first run, since that would hide real drift.
//!
//! This module also manages per-project completion markers, written after a
//! fetch fully succeeds, so an interrupted clone can be told apart from a
//! finished one.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory (inside the package cache) holding completion markers.
pub const MARKER_DIR: &str = ".markers";

/// Project name to installed revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstalledState {
    projects: BTreeMap<String, String>,
}

impl InstalledState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the revision installed for a project.
    pub fn record(&mut self, name: impl Into<String>, revision: impl Into<String>) {
        self.projects.insert(name.into(), revision.into());
    }

    pub fn revision(&self, name: &str) -> Option<&str> {
        self.projects.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Iterates over `(name, revision)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.projects.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InstalledState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            projects: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Load the state file, returning `None` when it does not exist.
pub fn load(path: &Path) -> Result<Option<InstalledState>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| Error::StateCorruption {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Write the state file, replacing any previous content.
///
/// The record is written to a temporary sibling first and renamed into
/// place, so readers see either the old or the new file.
pub fn save(path: &Path, state: &InstalledState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    let mut json = serde_json::to_string_pretty(state)?;
    json.push('\n');

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "state.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn marker_path(packages_dir: &Path, project: &str) -> PathBuf {
    packages_dir
        .join(MARKER_DIR)
        .join(format!("{}.done", escape_marker_name(project)))
}

/// Percent-escape separators (and `%` itself) so distinct project names
/// always map to distinct marker files.
fn escape_marker_name(project: &str) -> String {
    let mut escaped = String::with_capacity(project.len());
    for c in project.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            '\\' => escaped.push_str("%5C"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Mark a project as completely fetched.
pub fn write_marker(packages_dir: &Path, project: &str, revision: &str) -> Result<()> {
    let path = marker_path(packages_dir, project);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", revision))?;
    Ok(())
}

/// Returns `true` when a completion marker exists for the project.
pub fn has_marker(packages_dir: &Path, project: &str) -> bool {
    marker_path(packages_dir, project).is_file()
}

/// Returns `true` once any run has written markers into this package
/// directory. Caches installed before markers existed have none.
pub fn uses_markers(packages_dir: &Path) -> bool {
    packages_dir.join(MARKER_DIR).is_dir()
}

/// Remove a project's completion marker if present.
pub fn clear_marker(packages_dir: &Path, project: &str) -> Result<()> {
    match fs::remove_file(marker_path(packages_dir, project)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_first_run() {
        let temp = TempDir::new().unwrap();
        let state = load(&temp.path().join("state.json")).unwrap();
        assert!(state.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        let state: InstalledState = [("cmsis", "4b96cbb"), ("hal_st", "v1.2.0")]
            .into_iter()
            .collect();
        save(&path, &state).unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.revision("hal_st"), Some("v1.2.0"));
    }

    #[test]
    fn test_save_writes_flat_pretty_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        let mut state = InstalledState::new();
        state.record("zephyr", "main");
        save(&path, &state).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"zephyr\": \"main\"\n}\n");
        assert!(!temp.path().join("state.json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        save(&path, &[("a", "v1"), ("b", "v1")].into_iter().collect()).unwrap();
        save(&path, &[("a", "v2")].into_iter().collect()).unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.revision("a"), Some("v2"));
        assert!(!loaded.contains("b"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/_pio/state.json");
        save(&path, &InstalledState::new()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupted_state_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::StateCorruption { .. }));
        assert!(err.to_string().contains("state.json"));
    }

    #[test]
    fn test_state_with_wrong_shape_is_corrupted() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, r#"{"cmsis": 42}"#).unwrap();

        assert!(matches!(load(&path), Err(Error::StateCorruption { .. })));
    }

    #[test]
    fn test_markers() {
        let temp = TempDir::new().unwrap();
        let packages = temp.path();

        assert!(!has_marker(packages, "cmsis"));
        assert!(!uses_markers(packages));
        write_marker(packages, "cmsis", "4b96cbb").unwrap();
        assert!(has_marker(packages, "cmsis"));
        assert!(packages.join(MARKER_DIR).join("cmsis.done").is_file());

        clear_marker(packages, "cmsis").unwrap();
        assert!(!has_marker(packages, "cmsis"));
        // Clearing twice is fine
        clear_marker(packages, "cmsis").unwrap();
        assert!(uses_markers(packages));
    }

    #[test]
    fn test_marker_names_are_escaped() {
        let temp = TempDir::new().unwrap();
        write_marker(temp.path(), "group/project", "main").unwrap();
        assert!(temp
            .path()
            .join(MARKER_DIR)
            .join("group%2Fproject.done")
            .is_file());
    }

    #[test]
    fn test_marker_names_do_not_collide() {
        let temp = TempDir::new().unwrap();
        write_marker(temp.path(), "a/b", "main").unwrap();

        assert!(has_marker(temp.path(), "a/b"));
        assert!(!has_marker(temp.path(), "a-b"));
        assert!(!has_marker(temp.path(), "a%2Fb"));
    }
}
