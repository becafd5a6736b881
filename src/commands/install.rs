//! Install command implementation
//!
//! Runs one full reconciliation: skip if a previous run completed, otherwise
//! invalidate drifted packages, fetch what is missing and record the result.

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use west_fetch::filter::TargetContext;
use west_fetch::orchestrator::{InstallReport, Installer, RunConfig, RunOutcome};
use west_fetch::output::{emoji, OutputConfig};
use west_fetch::suggestions;

use super::PathArgs;

/// Arguments for the install command
#[derive(Args, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Target platform, used to select HAL packages (e.g. `ststm32`)
    #[arg(short, long, value_name = "NAME", env = "WEST_FETCH_PLATFORM")]
    pub platform: Option<String>,

    /// Reconcile even if a previous installation completed
    #[arg(long)]
    pub secondary_installation: bool,

    /// Re-fetch package directories left behind by an interrupted fetch
    #[arg(long)]
    pub verify_completion: bool,

    /// Show detailed progress information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl InstallArgs {
    fn run_config(&self) -> RunConfig {
        RunConfig::new(self.paths.packages_dir())
            .with_target(self.platform.clone().map(TargetContext::new))
            .with_secondary_installation(self.secondary_installation)
            .with_verbose(self.verbose)
            .with_verify_completion(self.verify_completion)
    }
}

/// Execute the install command
pub fn execute(args: InstallArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();
    let manifest_path = args.paths.manifest_path();
    let installer = Installer::new(args.run_config());

    if !args.quiet {
        let platform = args.platform.as_deref().unwrap_or("any platform");
        println!(
            "{} Installing west packages for {}",
            emoji(output, "📦", "[INSTALL]"),
            platform
        );
    }

    let outcome = installer
        .run(&manifest_path)
        .map_err(suggestions::explain)?;

    if args.quiet {
        return Ok(());
    }

    match outcome {
        RunOutcome::UpToDate => {
            println!(
                "{} Packages are already installed in {}",
                emoji(output, "✅", "[OK]"),
                installer.config().packages_dir.display()
            );
        }
        RunOutcome::Completed(report) => {
            print_report(&report, output, args.verbose);
            println!(
                "{} Done in {:.2}s",
                emoji(output, "✅", "[OK]"),
                start_time.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

fn print_report(report: &InstallReport, output: &OutputConfig, verbose: bool) {
    if !report.invalidated.is_empty() {
        println!(
            "{} Refreshed {} drifted package(s): {}",
            emoji(output, "🔄", "[DRIFT]"),
            report.invalidated.len(),
            report.invalidated.join(", ")
        );
    }
    println!(
        "   {} installed, {} already present",
        report.installed.len(),
        report.already_installed.len()
    );
    if verbose {
        if !report.ignored.is_empty() {
            println!("   ignored: {}", report.ignored.join(", "));
        }
        if !report.not_applicable.is_empty() {
            println!("   not required: {}", report.not_applicable.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(manifest: PathBuf, packages_dir: PathBuf) -> InstallArgs {
        InstallArgs {
            paths: PathArgs {
                manifest: Some(manifest),
                packages_dir: Some(packages_dir),
            },
            platform: None,
            secondary_installation: false,
            verify_completion: false,
            verbose: false,
            quiet: true,
        }
    }

    #[test]
    fn test_execute_missing_manifest_fails() {
        let temp = TempDir::new().unwrap();
        let args = args(temp.path().join("west.yml"), temp.path().join("_pio"));

        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_err());
        assert!(!temp.path().join("_pio").exists());
    }

    #[test]
    fn test_execute_up_to_date_is_success() {
        let temp = TempDir::new().unwrap();
        let packages = temp.path().join("_pio");
        fs::create_dir_all(&packages).unwrap();
        fs::write(packages.join("state.json"), "{}").unwrap();

        let result = execute(
            args(temp.path().join("west.yml"), packages),
            &OutputConfig::without_color(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_config_from_args() {
        let mut install = args(PathBuf::from("fw/west.yml"), PathBuf::from("cache"));
        install.platform = Some("ststm32".to_string());
        install.secondary_installation = true;
        install.verify_completion = true;

        let config = install.run_config();
        assert_eq!(config.packages_dir, PathBuf::from("cache"));
        assert_eq!(config.state_file, PathBuf::from("cache/state.json"));
        assert_eq!(config.target, Some(TargetContext::new("ststm32")));
        assert!(config.secondary_installation);
        assert!(config.verify_completion);
        assert!(!config.verbose);
    }
}
