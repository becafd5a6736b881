//! # West Fetch Library
//!
//! Installs the external source repositories listed in a west `west.yml`
//! manifest into a local package directory, and keeps that directory in step
//! with the manifest across runs.
//!
//! ## Quick Example
//!
//! ```
//! use west_fetch::filter::{self, Applicability, TargetContext};
//! use west_fetch::manifest;
//! use west_fetch::resolver::resolve_url;
//!
//! let manifest = manifest::parse(r#"
//! manifest:
//!   defaults:
//!     remote: upstream
//!   remotes:
//!     - name: upstream
//!       url-base: https://github.com/zephyrproject-rtos
//!   projects:
//!     - name: hal_nordic
//!       revision: v1.0.0
//!       path: modules/hal/nordic
//! "#).unwrap();
//!
//! let hal = manifest.project("hal_nordic").unwrap();
//! let url = resolve_url(hal, manifest.remotes(), manifest.default_remote()).unwrap();
//! assert_eq!(url, "https://github.com/zephyrproject-rtos/hal_nordic.git");
//!
//! let target = TargetContext::new("nordicnrf52");
//! assert_eq!(filter::evaluate(hal, Some(&target)), Applicability::Required);
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: typed remotes and projects, validated at parse
//!   time.
//! - **Resolver (`resolver`)**: computes the clone URL of a project.
//! - **Filter (`filter`)**: decides which projects a target platform needs.
//! - **State (`state`)**: the record of what the last successful run
//!   installed.
//! - **Drift (`drift`)**: finds projects whose pinned revision changed and
//!   deletes their stale directories.
//! - **Fetch (`fetch`, `git`, `repository`)**: clones one project at its
//!   pinned revision.
//! - **Orchestrator (`orchestrator`)**: runs the whole reconciliation.
//!
//! ## Execution Flow
//!
//! 1. Return early if a previous run completed (unless this is a secondary
//!    installation).
//! 2. Check that git is installed and load the manifest.
//! 3. Load the previous state and invalidate drifted projects.
//! 4. Install every required project that is not already present.
//! 5. Save the new state, or remove the package directory if anything failed.

pub mod defaults;
pub mod drift;
pub mod error;
pub mod fetch;
pub mod filesystem;
pub mod filter;
pub mod git;
pub mod lock;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod repository;
pub mod resolver;
pub mod state;
pub mod suggestions;
