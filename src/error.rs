//! # Error Handling
//!
//! This module defines the centralized error type for `west-fetch`. It uses
//! the `thiserror` library to describe every failure a reconciliation run can
//! hit, with enough context (project, remote, URL, path) for an operator to
//! act on the message without re-running in verbose mode.
//!
//! ## Taxonomy
//!
//! - **Configuration**: malformed manifest (`Config`, `ManifestNotFound`,
//!   `Yaml`). Always raised before the package cache is touched.
//! - **Environment**: the `git` client is missing (`Environment`).
//! - **Lookup**: a project references an undefined remote (`RemoteLookup`).
//! - **Fetch**: clone or checkout failed (`Fetch`, `GitCommand`,
//!   `DestinationExists`). Triggers full cleanup of the package cache.
//! - **State corruption**: the state file exists but is unreadable
//!   (`StateCorruption`). Never silently treated as a first run.
//!
//! Ambient failures (`Cleanup`, `CacheLocked`, `Io`, `Json`) cover the
//! filesystem work around those steps.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for west-fetch operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest is structurally invalid.
    ///
    /// Carries an optional hint describing how to fix the manifest.
    #[error("Manifest configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// The manifest file does not exist.
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// A required external tool is not available.
    #[error("Environment error: {message}")]
    Environment { message: String },

    /// A project references a remote that is not defined in the manifest.
    #[error("Remote lookup error for project `{project}`: remote `{remote}` is not defined")]
    RemoteLookup { project: String, remote: String },

    /// Cloning or checking out a project failed.
    #[error("Failed to install the `{project}` project from `{url}`: {message}")]
    Fetch {
        project: String,
        url: String,
        message: String,
    },

    /// A git command could not be run or exited unsuccessfully.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// The fetch destination already exists.
    ///
    /// The orchestrator skips existing directories before fetching, so hitting
    /// this means a caller skipped that check.
    #[error("Refusing to fetch `{project}` into existing directory {}", path.display())]
    DestinationExists { project: String, path: PathBuf },

    /// The state file exists but cannot be parsed.
    #[error("State file {} is corrupted: {message}", path.display())]
    StateCorruption { path: PathBuf, message: String },

    /// Removing the package cache after a failed run did not succeed.
    #[error("Failed to remove {} after failed installation: {source}. Please remove it manually", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another run holds the package cache lock.
    #[error("Package cache {} is locked by another run", path.display())]
    CacheLocked { path: PathBuf },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a configuration error without a hint.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            hint: None,
        }
    }

    /// Returns `true` for errors raised before any filesystem mutation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Config { .. } | Error::ManifestNotFound { .. } | Error::Yaml(_)
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
