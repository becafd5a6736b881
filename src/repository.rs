//! # Version Control Capability
//!
//! The fetch engine never calls `git` directly. It goes through the
//! [`GitOperations`] trait, which exposes exactly the operations the installer
//! needs: clone (with optional branch, depth and submodule recursion), hard
//! reset to a commit, and an availability check.
//!
//! In the application, [`DefaultGitOperations`] shells out to the system `git`
//! command. Tests substitute a recording implementation to simulate
//! successful and failing fetches without network access.

use std::path::Path;

use crate::error::Result;
use crate::git::CloneOptions;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target_dir`, which must not exist yet.
    fn clone_repository(
        &self,
        url: &str,
        target_dir: &Path,
        options: &CloneOptions,
        verbose: bool,
    ) -> Result<()>;

    /// Resets the working tree at `repo_dir` to exactly `revision`.
    fn reset_hard(&self, repo_dir: &Path, revision: &str, verbose: bool) -> Result<()>;

    /// Fails with an environment error when no git client is available.
    fn check_available(&self) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repository(
        &self,
        url: &str,
        target_dir: &Path,
        options: &CloneOptions,
        verbose: bool,
    ) -> Result<()> {
        crate::git::clone_repository(url, target_dir, options, verbose)
    }

    fn reset_hard(&self, repo_dir: &Path, revision: &str, verbose: bool) -> Result<()> {
        crate::git::reset_hard(repo_dir, revision, verbose)
    }

    fn check_available(&self) -> Result<()> {
        let version = crate::git::check_available()?;
        log::debug!("Using {}", version);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::error::Error;
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// A recorded call made against [`MockGitOperations`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum GitCall {
        Clone {
            url: String,
            target: PathBuf,
            options: CloneOptions,
        },
        Reset {
            dir: PathBuf,
            revision: String,
        },
    }

    /// Mock git operations for testing
    ///
    /// Successful clones create the target directory with a `.git` folder so
    /// later steps see a materialized package. URLs listed in `failing` fail
    /// after creating a partial directory, like an interrupted real clone.
    #[derive(Clone, Default)]
    pub struct MockGitOperations {
        calls: Arc<Mutex<Vec<GitCall>>>,
        failing: HashSet<String>,
        fail_reset: bool,
        unavailable: bool,
    }

    impl MockGitOperations {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(mut self, url: &str) -> Self {
            self.failing.insert(url.to_string());
            self
        }

        pub fn failing_reset(mut self) -> Self {
            self.fail_reset = true;
            self
        }

        pub fn unavailable(mut self) -> Self {
            self.unavailable = true;
            self
        }

        pub fn calls(&self) -> Vec<GitCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn cloned_urls(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    GitCall::Clone { url, .. } => Some(url),
                    GitCall::Reset { .. } => None,
                })
                .collect()
        }
    }

    impl GitOperations for MockGitOperations {
        fn clone_repository(
            &self,
            url: &str,
            target_dir: &Path,
            options: &CloneOptions,
            _verbose: bool,
        ) -> Result<()> {
            self.calls.lock().unwrap().push(GitCall::Clone {
                url: url.to_string(),
                target: target_dir.to_path_buf(),
                options: options.clone(),
            });

            fs::create_dir_all(target_dir.join(".git"))?;
            if self.failing.contains(url) {
                return Err(Error::GitCommand {
                    command: format!("git clone {}", url),
                    stderr: "fatal: repository not found".to_string(),
                });
            }
            fs::write(target_dir.join("README"), url)?;
            Ok(())
        }

        fn reset_hard(&self, repo_dir: &Path, revision: &str, _verbose: bool) -> Result<()> {
            self.calls.lock().unwrap().push(GitCall::Reset {
                dir: repo_dir.to_path_buf(),
                revision: revision.to_string(),
            });
            if self.fail_reset {
                return Err(Error::GitCommand {
                    command: format!("git reset --hard {}", revision),
                    stderr: format!("fatal: ambiguous argument '{}'", revision),
                });
            }
            fs::write(repo_dir.join(".git").join("HEAD"), revision)?;
            Ok(())
        }

        fn check_available(&self) -> Result<()> {
            if self.unavailable {
                return Err(Error::Environment {
                    message: "A Git client is not installed in your system".to_string(),
                });
            }
            Ok(())
        }
    }
}
