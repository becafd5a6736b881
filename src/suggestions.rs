//! # Error Suggestions
//!
//! Errors shown by the binary say what went wrong and how to fix it. Library
//! errors are wrapped here with `hint:` lines before they reach the user.

use std::path::Path;

use crate::error::Error;

/// The manifest file could not be found.
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Manifest not found: {path}\n\n\
         hint: Run from the framework directory that contains west.yml\n\
         hint: Use -m/--manifest to specify a different path\n\
         hint: Set the WEST_FETCH_MANIFEST environment variable",
        path = path.display()
    )
}

/// No git client on `PATH`.
pub fn git_not_installed(message: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "{message}\n\n\
         hint: Install git from https://git-scm.com/downloads\n\
         hint: Make sure the `git` executable is on your PATH"
    )
}

/// A project names a remote the manifest does not define.
pub fn unknown_remote(project: &str, remote: &str) -> anyhow::Error {
    let hint = if remote == "<default>" {
        "hint: Add `defaults: {remote: <name>}` to the manifest or set `remote:` on the project"
            .to_string()
    } else {
        format!("hint: Add a remote named `{remote}` under `remotes:` in the manifest")
    };
    anyhow::anyhow!("Project `{project}` refers to an unknown remote `{remote}`\n\n{hint}")
}

/// Another run holds the package cache lock.
pub fn cache_locked(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Package directory {path} is being updated by another run\n\n\
         hint: Wait for the other installation to finish and try again",
        path = path.display()
    )
}

/// The state file cannot be parsed.
pub fn state_corrupted(path: &Path, message: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "State file {path} is corrupted: {message}\n\n\
         hint: Run `west-fetch clean` to remove the package directory and reinstall",
        path = path.display()
    )
}

/// Convert a library error into a user-facing error, adding hints where one
/// is known.
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::ManifestNotFound { path } => manifest_not_found(&path),
        Error::Environment { message } => git_not_installed(&message),
        Error::RemoteLookup { project, remote } => unknown_remote(&project, &remote),
        Error::CacheLocked { path } => cache_locked(&path),
        Error::StateCorruption { path, message } => state_corrupted(&path, &message),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_manifest_not_found_includes_hints() {
        let message = manifest_not_found(Path::new("/fw/west.yml")).to_string();

        assert!(message.contains("Manifest not found: /fw/west.yml"));
        assert!(message.contains("-m/--manifest"));
        assert!(message.contains("WEST_FETCH_MANIFEST"));
    }

    #[test]
    fn test_git_not_installed_includes_download_link() {
        let message = git_not_installed("A Git client is not installed").to_string();

        assert!(message.starts_with("A Git client is not installed"));
        assert!(message.contains("git-scm.com"));
    }

    #[test]
    fn test_unknown_remote_without_default() {
        let message = unknown_remote("zephyr", "<default>").to_string();
        assert!(message.contains("defaults: {remote: <name>}"));
    }

    #[test]
    fn test_unknown_remote_named() {
        let message = unknown_remote("bsim", "babblesim").to_string();
        assert!(message.contains("Add a remote named `babblesim`"));
    }

    #[test]
    fn test_explain_passes_other_errors_through() {
        let explained = explain(Error::config("`projects` is missing"));
        assert!(explained.to_string().contains("`projects` is missing"));
        assert!(!explained.to_string().contains("hint:"));
    }

    #[test]
    fn test_explain_state_corruption_suggests_clean() {
        let explained = explain(Error::StateCorruption {
            path: PathBuf::from("_pio/state.json"),
            message: "expected value at line 1".to_string(),
        });
        assert!(explained.to_string().contains("west-fetch clean"));
    }
}
