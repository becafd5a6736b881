//! Status command implementation
//!
//! Prints, for every manifest project, whether the target needs it, whether
//! it is installed and whether its pinned revision drifted since the last
//! successful run. Nothing on disk is changed.

use anyhow::Result;
use clap::Args;
use west_fetch::filter::{Applicability, TargetContext};
use west_fetch::manifest;
use west_fetch::orchestrator::{Installer, ProjectStatus, RunConfig};
use west_fetch::output::{applicability_label, drift_label, emoji, OutputConfig};
use west_fetch::suggestions;

use super::PathArgs;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Target platform, used to select HAL packages (e.g. `ststm32`)
    #[arg(short, long, value_name = "NAME", env = "WEST_FETCH_PLATFORM")]
    pub platform: Option<String>,
}

/// Execute the status command
pub fn execute(args: StatusArgs, output: &OutputConfig) -> Result<()> {
    let manifest = manifest::from_file(args.paths.manifest_path()).map_err(suggestions::explain)?;
    let config = RunConfig::new(args.paths.packages_dir())
        .with_target(args.platform.clone().map(TargetContext::new));
    let statuses = Installer::new(config)
        .status(&manifest)
        .map_err(suggestions::explain)?;

    for status in &statuses {
        println!("{}", format_line(status, output));
    }

    let drifted = statuses.iter().filter(|s| s.is_drifted()).count();
    let missing = statuses
        .iter()
        .filter(|s| s.applicability == Applicability::Required && !s.present)
        .count();
    println!();
    if drifted == 0 && missing == 0 {
        println!("{} All required packages are installed", emoji(output, "✅", "[OK]"));
    } else {
        println!(
            "{} {} missing, {} drifted; run `west-fetch install --secondary-installation`",
            emoji(output, "⚠️ ", "[WARN]"),
            missing,
            drifted
        );
    }

    Ok(())
}

fn format_line(status: &ProjectStatus, output: &OutputConfig) -> String {
    let revision = match status.installed_revision.as_deref() {
        Some(installed) if status.is_drifted() => drift_label(output, installed, &status.revision),
        _ => status.revision.clone(),
    };
    let presence = if status.present { "present" } else { "missing" };

    format!(
        "{:<28} {:<8} {:<44} {}",
        status.name,
        presence,
        revision,
        applicability_label(output, &status.applicability)
    )
}
