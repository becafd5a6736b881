use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use log::{log, Level};

use crate::error::Error;

/// Flags for a `git clone` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// Branch or tag to check out (`--branch`).
    pub branch: Option<String>,
    /// History depth (`--depth`); `None` clones full history.
    pub depth: Option<u32>,
    /// Clone submodules too (`--recursive`).
    pub recursive: bool,
}

/// Build the argument list for `git clone`.
pub fn clone_args(url: &str, target_dir: &Path, options: &CloneOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["clone".into()];

    if let Some(branch) = &options.branch {
        args.push("--branch".into());
        args.push(branch.into());
    }
    if let Some(depth) = options.depth {
        args.push("--depth".into());
        args.push(depth.to_string().into());
    }
    if options.recursive {
        args.push("--recursive".into());
    }

    args.push("--".into());
    args.push(url.into());
    args.push(target_dir.as_os_str().to_owned());
    args
}

fn level(verbose: bool) -> Level {
    if verbose {
        Level::Info
    } else {
        Level::Debug
    }
}

fn describe(args: &[OsString]) -> String {
    let parts: Vec<String> = args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    format!("git {}", parts.join(" "))
}

/// Clone a repository using the system git command
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
pub fn clone_repository(
    url: &str,
    target_dir: &Path,
    options: &CloneOptions,
    verbose: bool,
) -> Result<(), Error> {
    let args = clone_args(url, target_dir, options);
    let command = describe(&args);
    log!(level(verbose), "Running command: {}", command);

    let output = Command::new("git")
        .args(&args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command.clone(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Provide helpful error message for common auth failures
        let stderr = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, ensure you have:\n\
                - SSH key added to ssh-agent\n\
                - Git credentials configured\n\
                - Personal access token set up\n\
                Error: {}",
                stderr.trim()
            )
        } else {
            stderr.trim().to_string()
        };

        return Err(Error::GitCommand { command, stderr });
    }

    Ok(())
}

/// Hard-reset a working tree to `revision`.
pub fn reset_hard(repo_dir: &Path, revision: &str, verbose: bool) -> Result<(), Error> {
    let command = format!("git reset --hard {}", revision);
    log!(
        level(verbose),
        "Running command: {} (in {})",
        command,
        repo_dir.display()
    );

    let output = Command::new("git")
        .args(["reset", "--hard", revision])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command.clone(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Check that a git client is installed, returning its version line.
pub fn check_available() -> Result<String, Error> {
    let not_installed = |detail: String| Error::Environment {
        message: format!(
            "A Git client is not installed in your system ({}). \
             Install a Git client from https://git-scm.com/downloads and try again",
            detail
        ),
    };

    let output = Command::new("git")
        .arg("--version")
        .output()
        .map_err(|e| not_installed(e.to_string()))?;

    if !output.status.success() {
        return Err(not_installed(format!("git --version exited with {}", output.status)));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Read the commit `HEAD` points at in a working tree.
pub fn head_commit(repo_dir: &Path) -> Result<String, Error> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: "git rev-parse HEAD".to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: "git rev-parse HEAD".to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
