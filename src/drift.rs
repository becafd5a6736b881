//! # Drift Detection
//!
//! Compares the revisions recorded by the last successful run against the
//! revisions the manifest currently pins. A project that appears in both with
//! a different revision has drifted: its package directory holds a checkout
//! of the old revision and must be removed before the new one is fetched.
//!
//! Without a previous record (first run) there is no drift; everything is
//! installed through the normal required/absent path instead.

use std::path::Path;

use log::{info, warn};

use crate::error::Result;
use crate::filesystem::{remove_tree, Removal};
use crate::manifest::Manifest;
use crate::state::InstalledState;

/// A project whose pinned revision changed since it was installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub name: String,
    pub previous_revision: String,
    pub new_revision: String,
    /// Package path relative to the package directory.
    pub path: String,
}

/// List drifted projects in manifest order.
pub fn detect(previous: Option<&InstalledState>, manifest: &Manifest) -> Vec<Drift> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    manifest
        .projects()
        .iter()
        .filter_map(|project| {
            let recorded = previous.revision(&project.name)?;
            (recorded != project.revision).then(|| Drift {
                name: project.name.clone(),
                previous_revision: recorded.to_string(),
                new_revision: project.revision.clone(),
                path: project.path.clone(),
            })
        })
        .collect()
}

/// What happened to one drifted package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub name: String,
    pub removed: bool,
}

/// Delete the package directories of drifted projects.
///
/// A directory that is already gone is logged and reported with
/// `removed: false`; it is not an error.
pub fn invalidate(drifts: &[Drift], packages_dir: &Path) -> Result<Vec<Invalidation>> {
    let mut outcomes = Vec::with_capacity(drifts.len());

    for drift in drifts {
        info!(
            "Package `{}` version differs from the manifest ({} -> {}), upgrading",
            drift.name, drift.previous_revision, drift.new_revision
        );

        let removed = match remove_tree(&packages_dir.join(&drift.path))? {
            Removal::Removed => true,
            Removal::Missing => {
                warn!(
                    "Package path `{}` for `{}` not found, nothing to remove",
                    drift.path, drift.name
                );
                false
            }
        };

        outcomes.push(Invalidation {
            name: drift.name.clone(),
            removed,
        });
    }

    Ok(outcomes)
}
