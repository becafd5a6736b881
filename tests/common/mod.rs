//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::MINIMAL);
//!     fixture.command().arg("status").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git;
    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// One project on the default remote.
    pub const MINIMAL: &str = r#"
manifest:
  defaults:
    remote: upstream
  remotes:
    - name: upstream
      url-base: https://github.com/zephyrproject-rtos
  projects:
    - name: cmsis
      revision: 4b96cbb174678dcd3ca86e11e1f24bc5f8726da0
      path: modules/hal/cmsis
"#;

    /// A mix of required, HAL, tooling and ignored projects.
    pub const MIXED: &str = r#"
manifest:
  defaults:
    remote: upstream
  remotes:
    - name: upstream
      url-base: https://github.com/zephyrproject-rtos
  projects:
    - name: cmsis
      revision: v5.9.0
      path: modules/hal/cmsis
    - name: hal_stm32
      revision: v2023.1
      path: modules/hal/stm32
    - name: hal_nordic
      revision: v3.1.0
      path: modules/hal/nordic
    - name: net-tools
      revision: main
      path: tools/net-tools
    - name: trusted-firmware-m
      revision: v1.8.0
      path: modules/tee/tf-m/trusted-firmware-m
"#;

    /// `projects` is missing.
    pub const NO_PROJECTS: &str = r#"
manifest:
  remotes:
    - name: upstream
      url-base: https://github.com/zephyrproject-rtos
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "manifest: [unclosed";
}

/// A temporary framework directory holding a `west.yml` and its `_pio`
/// package directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `west.yml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("west.yml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Write a state file into the package directory.
    #[allow(dead_code)]
    pub fn with_state(self, json: &str) -> Self {
        self.temp_dir
            .child("_pio/state.json")
            .write_str(json)
            .expect("Failed to write state file");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join("west.yml")
    }

    #[allow(dead_code)]
    pub fn packages_dir(&self) -> PathBuf {
        self.temp_dir.path().join("_pio")
    }

    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in this fixture's directory, isolated from
    /// `WEST_FETCH_*` variables in the caller's environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("west-fetch");
        cmd.current_dir(self.path())
            .env_remove("WEST_FETCH_MANIFEST")
            .env_remove("WEST_FETCH_PACKAGES")
            .env_remove("WEST_FETCH_PLATFORM")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Helpers for building local git repositories to clone from.
#[allow(dead_code)]
pub mod git {
    use super::*;

    fn run(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "west-fetch tests")
            .env("GIT_AUTHOR_EMAIL", "tests@example.com")
            .env("GIT_COMMITTER_NAME", "west-fetch tests")
            .env("GIT_COMMITTER_EMAIL", "tests@example.com")
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Create a repository at `dir` on branch `main` with one commit per
    /// `(file, content)` pair. Returns the commit hashes in order.
    pub fn init_repo(dir: &Path, commits: &[(&str, &str)]) -> Vec<String> {
        std::fs::create_dir_all(dir).expect("Failed to create repository directory");
        run(dir, &["init", "--quiet", "--initial-branch=main"]);
        commits
            .iter()
            .map(|(file, content)| commit(dir, file, content))
            .collect()
    }

    /// Commit one file and return the new HEAD.
    pub fn commit(dir: &Path, file: &str, content: &str) -> String {
        std::fs::write(dir.join(file), content).expect("Failed to write file");
        run(dir, &["add", file]);
        run(dir, &["commit", "--quiet", "-m", &format!("Update {}", file)]);
        head(dir)
    }

    pub fn tag(dir: &Path, name: &str) {
        run(dir, &["tag", name]);
    }

    pub fn head(dir: &Path) -> String {
        run(dir, &["rev-parse", "HEAD"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::MINIMAL);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_fixture_with_state() {
        let fixture = TestFixture::new().with_state("{}");
        assert!(fixture.packages_dir().join("state.json").exists());
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        for manifest in [manifests::MINIMAL, manifests::MIXED, manifests::NO_PROJECTS] {
            serde_yaml::from_str::<serde_yaml::Value>(manifest)
                .expect("Manifest should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        assert!(serde_yaml::from_str::<serde_yaml::Value>(manifests::INVALID_YAML).is_err());
    }
}
