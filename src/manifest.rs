//! # Manifest Model
//!
//! This module defines the typed, validated in-memory form of a west-style
//! `west.yml` manifest: a [`RemoteRegistry`] mapping remote names to URL bases,
//! an optional default remote, and an ordered list of [`ProjectEntry`] values.
//!
//! ## Parsing
//!
//! Parsing happens in two stages:
//!
//! 1.  **Raw form**: the YAML document is deserialized with `serde_yaml` into
//!     [`RawManifest`], where every field is optional. Unknown west keys
//!     (`self`, `group-filter`, `import`, ...) are ignored.
//!
//! 2.  **Validation**: [`Manifest::from_raw`] checks the mandatory collections,
//!     revisions and name uniqueness once, so downstream components work with
//!     typed fields and never re-check raw keys.
//!
//! Project order is preserved from the source document and defines install
//! order.
//!
//! ```
//! use west_fetch::manifest;
//!
//! let manifest = manifest::parse(r#"
//! manifest:
//!   defaults:
//!     remote: upstream
//!   remotes:
//!     - name: upstream
//!       url-base: https://github.com/zephyrproject-rtos
//!   projects:
//!     - name: cmsis
//!       revision: 4b96cbb174678dcd3ca86e11e1f24bc5f8726da0
//!       path: modules/hal/cmsis
//! "#).unwrap();
//!
//! assert_eq!(manifest.projects().len(), 1);
//! assert_eq!(manifest.default_remote(), Some("upstream"));
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Commit hashes are at least seven lowercase hex digits.
static COMMIT_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{7,}$").expect("commit hash pattern is valid"));

/// Returns `true` when `revision` looks like a commit hash rather than a
/// branch or tag name.
///
/// ```
/// use west_fetch::manifest::is_commit_hash;
///
/// assert!(is_commit_hash("4b96cbb"));
/// assert!(!is_commit_hash("v3.5.0"));
/// assert!(!is_commit_hash("abc12"));
/// ```
pub fn is_commit_hash(revision: &str) -> bool {
    COMMIT_HASH.is_match(revision)
}

/// How a revision pins a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionKind {
    /// An exact commit hash.
    Commit,
    /// A branch or tag name.
    Symbolic,
}

impl RevisionKind {
    pub fn of(revision: &str) -> Self {
        if is_commit_hash(revision) {
            RevisionKind::Commit
        } else {
            RevisionKind::Symbolic
        }
    }
}

/// Mapping from remote name to its URL base.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRegistry {
    remotes: BTreeMap<String, String>,
}

impl RemoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a remote, returning the previous URL base if the name was
    /// already taken.
    pub fn insert(&mut self, name: impl Into<String>, url_base: impl Into<String>) -> Option<String> {
        self.remotes.insert(name.into(), url_base.into())
    }

    /// Looks up the URL base of a remote.
    pub fn url_base(&self, name: &str) -> Option<&str> {
        self.remotes.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.remotes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }

    /// Iterates over `(name, url_base)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.remotes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A single external project declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    /// Unique project name.
    pub name: String,
    /// Install location relative to the package directory.
    pub path: String,
    /// Commit hash, branch or tag.
    pub revision: String,
    /// Remote overriding the manifest default.
    pub remote: Option<String>,
    /// Explicit URL base; takes precedence over any remote.
    pub url: Option<String>,
    /// Repository path under the remote, if it differs from the name.
    pub repo_path: Option<String>,
    /// Whether submodules are cloned recursively.
    pub submodules: bool,
}

impl ProjectEntry {
    /// Creates an entry installed at a path equal to its name.
    pub fn new(name: impl Into<String>, revision: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            revision: revision.into(),
            remote: None,
            url: None,
            repo_path: None,
            submodules: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_repo_path(mut self, repo_path: impl Into<String>) -> Self {
        self.repo_path = Some(repo_path.into());
        self
    }

    pub fn with_submodules(mut self, submodules: bool) -> Self {
        self.submodules = submodules;
        self
    }

    pub fn revision_kind(&self) -> RevisionKind {
        RevisionKind::of(&self.revision)
    }
}

/// The validated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    remotes: RemoteRegistry,
    default_remote: Option<String>,
    projects: Vec<ProjectEntry>,
}

impl Manifest {
    /// Builds a manifest from typed parts, enforcing name uniqueness,
    /// non-empty revisions and package paths that stay inside the package
    /// directory.
    pub fn new(
        remotes: RemoteRegistry,
        default_remote: Option<String>,
        projects: Vec<ProjectEntry>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for project in &projects {
            if project.name.trim().is_empty() {
                return Err(Error::Config {
                    message: "Found a project without a name".to_string(),
                    hint: Some("Every entry under `projects` needs a `name:`".to_string()),
                });
            }
            if !seen.insert(project.name.as_str()) {
                return Err(Error::config(format!(
                    "Project `{}` is declared more than once",
                    project.name
                )));
            }
            if project.revision.trim().is_empty() {
                return Err(missing_revision(&project.name));
            }
            check_package_path(project)?;
        }

        Ok(Self {
            remotes,
            default_remote: default_remote.filter(|r| !r.is_empty()),
            projects,
        })
    }

    /// Validates a raw manifest.
    ///
    /// Fails when `projects` or `remotes` is absent, a remote has no
    /// `url-base`, or a project has no revision.
    pub fn from_raw(raw: RawManifest) -> Result<Self> {
        let raw_projects = raw.projects.ok_or_else(|| Error::Config {
            message: "Missing the `projects` field in the package manifest".to_string(),
            hint: Some("List the required repositories under `manifest.projects`".to_string()),
        })?;
        let raw_remotes = raw.remotes.ok_or_else(|| Error::Config {
            message: "Missing the `remotes` field in the package manifest".to_string(),
            hint: Some("Declare at least one remote under `manifest.remotes`".to_string()),
        })?;

        let mut remotes = RemoteRegistry::new();
        for remote in raw_remotes {
            let url_base = remote.url_base.ok_or_else(|| Error::Config {
                message: format!("Remote `{}` has no `url-base`", remote.name),
                hint: None,
            })?;
            if remotes.insert(remote.name.clone(), url_base).is_some() {
                return Err(Error::config(format!(
                    "Remote `{}` is declared more than once",
                    remote.name
                )));
            }
        }

        let projects = raw_projects
            .into_iter()
            .map(RawProject::into_entry)
            .collect::<Result<Vec<_>>>()?;

        let default_remote = raw.defaults.and_then(|d| d.remote);
        Self::new(remotes, default_remote, projects)
    }

    pub fn remotes(&self) -> &RemoteRegistry {
        &self.remotes
    }

    pub fn default_remote(&self) -> Option<&str> {
        self.default_remote.as_deref()
    }

    /// Projects in manifest order.
    pub fn projects(&self) -> &[ProjectEntry] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&ProjectEntry> {
        self.projects.iter().find(|p| p.name == name)
    }
}

fn missing_revision(project: &str) -> Error {
    Error::Config {
        message: format!("Missing revision for the `{}` project", project),
        hint: Some("Pin the project with `revision:` (a commit hash, branch or tag)".to_string()),
    }
}

/// Package paths are joined onto the package directory, so they must be
/// relative, free of `..` and name at least one directory.
fn check_package_path(project: &ProjectEntry) -> Result<()> {
    let path = Path::new(&project.path);
    let mut named = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(outside_package_dir(project));
            }
        }
    }
    if !named {
        return Err(outside_package_dir(project));
    }
    Ok(())
}

fn outside_package_dir(project: &ProjectEntry) -> Error {
    Error::Config {
        message: format!(
            "Path `{}` of the `{}` project is outside the package directory",
            project.path, project.name
        ),
        hint: Some("Use a relative `path:` without `..`, e.g. `modules/hal/cmsis`".to_string()),
    }
}

////// RAW (UNVALIDATED) FORM //////

/// Top-level west document; the manifest lives under the `manifest` key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestDocument {
    #[serde(default)]
    pub manifest: Option<RawManifest>,
}

/// The `manifest` mapping as written, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawManifest {
    #[serde(default)]
    pub defaults: Option<RawDefaults>,
    #[serde(default)]
    pub remotes: Option<Vec<RawRemote>>,
    #[serde(default)]
    pub projects: Option<Vec<RawProject>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDefaults {
    #[serde(default)]
    pub remote: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRemote {
    pub name: String,
    #[serde(default, rename = "url-base")]
    pub url_base: Option<String>,
}

/// West accepts either a boolean or a list of submodule paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSubmodules {
    Flag(bool),
    List(Vec<serde_yaml::Value>),
}

impl RawSubmodules {
    fn requested(&self) -> bool {
        match self {
            RawSubmodules::Flag(flag) => *flag,
            RawSubmodules::List(list) => !list.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "repo-path")]
    pub repo_path: Option<String>,
    #[serde(default)]
    pub submodules: Option<RawSubmodules>,
}

impl RawProject {
    fn into_entry(self) -> Result<ProjectEntry> {
        let name = self.name.filter(|n| !n.trim().is_empty()).ok_or_else(|| Error::Config {
            message: "Found a project without a name".to_string(),
            hint: Some("Every entry under `projects` needs a `name:`".to_string()),
        })?;
        let revision = match self.revision {
            Some(rev) if !rev.trim().is_empty() => rev,
            _ => return Err(missing_revision(&name)),
        };
        let path = self
            .path
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| name.clone());

        Ok(ProjectEntry {
            name,
            path,
            revision,
            remote: self.remote,
            url: self.url,
            repo_path: self.repo_path,
            submodules: self.submodules.is_some_and(|s| s.requested()),
        })
    }
}

/// Parse a west manifest from a YAML string.
pub fn parse(yaml_content: &str) -> Result<Manifest> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml_content)?;
    let document = if value.is_null() {
        ManifestDocument::default()
    } else {
        serde_yaml::from_value::<ManifestDocument>(value)?
    };
    Manifest::from_raw(document.manifest.unwrap_or_default())
}

/// Read and parse a west manifest file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::ManifestNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}
