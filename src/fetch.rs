//! # Fetch Engine
//!
//! Materializes one manifest project at its pinned revision.
//!
//! Branch and tag pins are fetched with a shallow, single-branch clone. A
//! shallow clone cannot target an arbitrary commit, so commit pins take two
//! steps: a full clone followed by `git reset --hard <commit>`.

use std::fs;
use std::path::Path;

use log::{error, info, warn};

use crate::error::{Error, Result};
use crate::git::CloneOptions;
use crate::manifest::{ProjectEntry, RemoteRegistry, RevisionKind};
use crate::repository::{DefaultGitOperations, GitOperations};
use crate::resolver::resolve_url;

/// Branch cloned when a project has an empty revision.
pub const DEFAULT_BRANCH: &str = "main";

/// Depth of shallow clones for branch and tag pins.
pub const SHALLOW_DEPTH: u32 = 1;

/// Clone flags for a project's revision.
pub fn clone_options(entry: &ProjectEntry) -> CloneOptions {
    match entry.revision_kind() {
        RevisionKind::Commit => CloneOptions {
            branch: None,
            depth: None,
            recursive: entry.submodules,
        },
        RevisionKind::Symbolic => {
            let branch = if entry.revision.is_empty() {
                warn!(
                    "Commit hash is not specified for `{}`! Using the `{}` branch instead!",
                    entry.name, DEFAULT_BRANCH
                );
                DEFAULT_BRANCH.to_string()
            } else {
                entry.revision.clone()
            };
            CloneOptions {
                branch: Some(branch),
                depth: Some(SHALLOW_DEPTH),
                recursive: entry.submodules,
            }
        }
    }
}

/// Installs projects through a [`GitOperations`] implementation.
pub struct FetchEngine {
    git: Box<dyn GitOperations>,
    verbose: bool,
}

impl FetchEngine {
    /// Creates an engine backed by the system `git` command.
    pub fn new(verbose: bool) -> Self {
        Self::with_operations(Box::new(DefaultGitOperations), verbose)
    }

    /// Creates an engine with a custom `GitOperations` implementation.
    pub fn with_operations(git: Box<dyn GitOperations>, verbose: bool) -> Self {
        Self { git, verbose }
    }

    /// Fails with an environment error if the VCS client is missing.
    pub fn check_available(&self) -> Result<()> {
        self.git.check_available()
    }

    /// Clone `entry` into `destination` at its pinned revision.
    ///
    /// The destination must not exist; its parent directories are created.
    /// On failure the partially cloned directory is left for the caller to
    /// clean up.
    pub fn install(
        &self,
        entry: &ProjectEntry,
        destination: &Path,
        registry: &RemoteRegistry,
        default_remote: Option<&str>,
    ) -> Result<()> {
        let url = resolve_url(entry, registry, default_remote)?;

        if destination.exists() {
            return Err(Error::DestinationExists {
                project: entry.name.clone(),
                path: destination.to_path_buf(),
            });
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.verbose {
            info!("Cloning package to `{}`", destination.display());
        }

        let options = clone_options(entry);
        let fetch_error = |e: Error| Error::Fetch {
            project: entry.name.clone(),
            url: url.clone(),
            message: e.to_string(),
        };

        if let Err(e) = self
            .git
            .clone_repository(&url, destination, &options, self.verbose)
        {
            error!("Failed to clone project from `{}`!", url);
            return Err(fetch_error(e));
        }

        if entry.revision_kind() == RevisionKind::Commit {
            self.git
                .reset_hard(destination, &entry.revision, self.verbose)
                .map_err(fetch_error)?;
        }

        Ok(())
    }
}
