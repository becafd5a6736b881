//! # Installer Orchestrator
//!
//! Coordinates a complete reconciliation run:
//!
//! 1. **Short circuit**: an existing state file means a previous run finished;
//!    nothing is done unless this is a secondary installation.
//! 2. **Environment**: the git client must be available.
//! 3. **Manifest**: parse and validate; configuration errors abort before the
//!    package cache is touched.
//! 4. **State**: load the record of the last successful run, if any.
//! 5. **Drift**: delete package directories whose pinned revision changed.
//! 6. **Install**: walk the projects in manifest order. Skip projects the
//!    target does not need, keep directories that already exist, skip ignored
//!    projects, fetch the rest. The first failure stops the walk.
//! 7. **Persist or clean up**: on success the new state is written; on
//!    failure the whole package directory is removed and no state is written,
//!    so the next run starts from scratch.
//!
//! The run is single-threaded and holds an advisory lock on the package cache
//! from step 4 onwards.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, log, warn, Level};

use crate::defaults;
use crate::drift;
use crate::error::{Error, Result};
use crate::fetch::FetchEngine;
use crate::filesystem::{remove_tree, Removal};
use crate::filter::{self, Applicability, TargetContext};
use crate::lock::CacheLock;
use crate::manifest::{self, Manifest, ProjectEntry};
use crate::state::{self, InstalledState};

/// Settings for one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Root of the package cache.
    pub packages_dir: PathBuf,
    /// Where the installed-state record lives.
    pub state_file: PathBuf,
    /// Platform the packages are installed for.
    pub target: Option<TargetContext>,
    /// Reconcile even when a state file already exists.
    pub secondary_installation: bool,
    /// Log progress details at info level instead of debug.
    pub verbose: bool,
    /// Treat existing package directories without a completion marker as
    /// interrupted fetches.
    pub verify_completion: bool,
}

impl RunConfig {
    /// Creates a configuration with the state file inside `packages_dir`.
    pub fn new(packages_dir: impl Into<PathBuf>) -> Self {
        let packages_dir = packages_dir.into();
        Self {
            state_file: defaults::state_file(&packages_dir),
            packages_dir,
            target: None,
            secondary_installation: false,
            verbose: false,
            verify_completion: false,
        }
    }

    pub fn with_target(mut self, target: Option<TargetContext>) -> Self {
        self.target = target;
        self
    }

    pub fn with_secondary_installation(mut self, secondary: bool) -> Self {
        self.secondary_installation = secondary;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_verify_completion(mut self, verify: bool) -> Self {
        self.verify_completion = verify;
        self
    }

    fn package_path(&self, entry: &ProjectEntry) -> PathBuf {
        self.packages_dir.join(&entry.path)
    }
}

/// What a completed reconciliation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Drifted projects whose directories were invalidated.
    pub invalidated: Vec<String>,
    /// Projects fetched during this run.
    pub installed: Vec<String>,
    /// Projects whose directories already existed.
    pub already_installed: Vec<String>,
    /// Projects skipped because they are on the ignore list.
    pub ignored: Vec<String>,
    /// Projects the target platform does not need.
    pub not_applicable: Vec<String>,
    /// The state record produced by the run.
    pub state: InstalledState,
}

/// Result of [`Installer::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A state file exists and this is not a secondary installation.
    UpToDate,
    Completed(InstallReport),
}

/// Read-only view of one project, as reported by [`Installer::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStatus {
    pub name: String,
    pub path: String,
    pub applicability: Applicability,
    /// Revision pinned by the manifest.
    pub revision: String,
    /// Revision recorded by the last successful run.
    pub installed_revision: Option<String>,
    /// Whether the package directory exists.
    pub present: bool,
}

impl ProjectStatus {
    pub fn is_drifted(&self) -> bool {
        self.installed_revision
            .as_deref()
            .is_some_and(|installed| installed != self.revision)
    }
}

/// Drives reconciliation of a manifest against the package cache.
pub struct Installer {
    config: RunConfig,
    fetcher: FetchEngine,
}

impl Installer {
    /// Creates an installer that fetches with the system `git` command.
    pub fn new(config: RunConfig) -> Self {
        let fetcher = FetchEngine::new(config.verbose);
        Self::with_fetch_engine(config, fetcher)
    }

    /// Creates an installer with a custom fetch engine.
    pub fn with_fetch_engine(config: RunConfig, fetcher: FetchEngine) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn notice(&self) -> Level {
        if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    /// Execute a complete run against the manifest at `manifest_path`.
    pub fn run(&self, manifest_path: &Path) -> Result<RunOutcome> {
        if self.config.state_file.is_file() && !self.config.secondary_installation {
            log!(
                self.notice(),
                "The state file is present. Skipping installation."
            );
            return Ok(RunOutcome::UpToDate);
        }

        self.fetcher.check_available()?;
        let manifest = manifest::from_file(manifest_path)?;
        self.reconcile(&manifest).map(RunOutcome::Completed)
    }

    /// Reconcile an already-parsed manifest against the package cache.
    pub fn reconcile(&self, manifest: &Manifest) -> Result<InstallReport> {
        let packages_dir = &self.config.packages_dir;
        let _lock = CacheLock::acquire(packages_dir)?;

        let previous = state::load(&self.config.state_file)?;
        let drifts = drift::detect(previous.as_ref(), manifest);

        fs::create_dir_all(packages_dir)?;
        let invalidated = drift::invalidate(&drifts, packages_dir)?;
        for drifted in &drifts {
            state::clear_marker(packages_dir, &drifted.name)?;
        }

        let mut report = InstallReport {
            invalidated: invalidated.into_iter().map(|i| i.name).collect(),
            ..InstallReport::default()
        };

        if let Err(e) = self.install_projects(manifest, previous.as_ref(), &mut report) {
            error!("{}", e);
            self.clean_up()?;
            return Err(e);
        }

        if report.state.is_empty() {
            debug!("No projects recorded; state file not written");
        } else {
            state::save(&self.config.state_file, &report.state)?;
        }

        Ok(report)
    }

    fn install_projects(
        &self,
        manifest: &Manifest,
        previous: Option<&InstalledState>,
        report: &mut InstallReport,
    ) -> Result<()> {
        let packages_dir = &self.config.packages_dir;

        for entry in manifest.projects() {
            let applicability = filter::evaluate(entry, self.config.target.as_ref());
            if let Applicability::NotApplicable(reason) = &applicability {
                debug!("`{}` is not required: {}", entry.name, reason);
                report.not_applicable.push(entry.name.clone());
                continue;
            }

            let ignored = applicability == Applicability::Ignored;
            let package_path = self.config.package_path(entry);
            if package_path.is_dir() {
                // Ignored packages are never fetched, so an existing one is kept as is.
                if ignored || self.is_complete(entry, previous) {
                    log!(self.notice(), "`{}` is already installed!", entry.name);
                    report.state.record(&entry.name, &entry.revision);
                    report.already_installed.push(entry.name.clone());
                    continue;
                }
                warn!(
                    "`{}` has no completion marker, fetching it again",
                    entry.name
                );
                remove_tree(&package_path)?;
            }

            if ignored {
                log!(self.notice(), "`{}` is ignored!", entry.name);
                report.ignored.push(entry.name.clone());
                continue;
            }

            info!("Installing `{}` project", entry.name);
            self.fetcher.install(
                entry,
                &package_path,
                manifest.remotes(),
                manifest.default_remote(),
            )?;
            state::write_marker(packages_dir, &entry.name, &entry.revision)?;

            report.state.record(&entry.name, &entry.revision);
            report.installed.push(entry.name.clone());
        }

        Ok(())
    }

    /// An existing directory counts as installed unless completion checks are
    /// enabled, in which case it needs a marker. A matching state record is
    /// only accepted for caches that predate markers entirely.
    fn is_complete(&self, entry: &ProjectEntry, previous: Option<&InstalledState>) -> bool {
        let packages_dir = &self.config.packages_dir;
        if !self.config.verify_completion || state::has_marker(packages_dir, &entry.name) {
            return true;
        }
        !state::uses_markers(packages_dir)
            && previous.and_then(|p| p.revision(&entry.name)) == Some(entry.revision.as_str())
    }

    fn clean_up(&self) -> Result<()> {
        let packages_dir = &self.config.packages_dir;
        log!(
            self.notice(),
            "Installation failed. Cleaning package directory..."
        );
        remove_tree(packages_dir).map_err(|source| Error::Cleanup {
            path: packages_dir.clone(),
            source,
        })?;
        Ok(())
    }

    /// Describe every manifest project without changing anything on disk.
    pub fn status(&self, manifest: &Manifest) -> Result<Vec<ProjectStatus>> {
        let previous = state::load(&self.config.state_file)?;

        Ok(manifest
            .projects()
            .iter()
            .map(|entry| ProjectStatus {
                name: entry.name.clone(),
                path: entry.path.clone(),
                applicability: filter::evaluate(entry, self.config.target.as_ref()),
                revision: entry.revision.clone(),
                installed_revision: previous
                    .as_ref()
                    .and_then(|p| p.revision(&entry.name))
                    .map(str::to_string),
                present: self.config.package_path(entry).is_dir(),
            })
            .collect())
    }
}

/// Remove the whole package cache, state file included.
pub fn clean(packages_dir: &Path) -> Result<Removal> {
    let _lock = CacheLock::acquire(packages_dir)?;
    remove_tree(packages_dir).map_err(|source| Error::Cleanup {
        path: packages_dir.to_path_buf(),
        source,
    })
}
