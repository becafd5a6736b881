//! # CLI Command Implementations
//!
//! One module per `west-fetch` subcommand. Each module defines an `Args`
//! struct derived with `clap` and an `execute` function that calls into the
//! `west_fetch` library.
//!
//! Options shared by several commands live in [`PathArgs`].

pub mod clean;
pub mod completions;
pub mod install;
pub mod status;

use std::path::PathBuf;

use clap::Args;
use west_fetch::defaults;

/// Where the manifest and the package directory are.
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Path to the west manifest
    #[arg(short, long, value_name = "PATH", env = "WEST_FETCH_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Package directory (defaults to `_pio` next to the manifest)
    #[arg(short = 'd', long, value_name = "PATH", env = "WEST_FETCH_PACKAGES")]
    pub packages_dir: Option<PathBuf>,
}

impl PathArgs {
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(defaults::default_manifest_path)
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.packages_dir
            .clone()
            .unwrap_or_else(|| defaults::default_packages_dir(&self.manifest_path()))
    }
}
