//! Clean command implementation
//!
//! Deletes the package directory, state file included, so the next
//! `install` starts from scratch.

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use west_fetch::filesystem::Removal;
use west_fetch::orchestrator;
use west_fetch::output::{emoji, OutputConfig};
use west_fetch::suggestions;

use super::PathArgs;

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the clean command
pub fn execute(args: CleanArgs, output: &OutputConfig) -> Result<()> {
    let packages_dir = args.paths.packages_dir();

    if !packages_dir.exists() {
        println!("Nothing to clean at {}", packages_dir.display());
        return Ok(());
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Remove {} and all installed packages?", packages_dir.display()))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Clean cancelled.");
            return Ok(());
        }
    }

    match orchestrator::clean(&packages_dir).map_err(suggestions::explain)? {
        Removal::Removed => println!(
            "{} Removed {}",
            emoji(output, "🗑️ ", "[CLEAN]"),
            packages_dir.display()
        ),
        Removal::Missing => println!("Nothing to clean at {}", packages_dir.display()),
    }

    Ok(())
}
