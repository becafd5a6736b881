//! # West Fetch CLI
//!
//! Binary entry point for the `west-fetch` command-line tool. It parses
//! arguments with `clap`, runs the selected command and lets `anyhow` turn
//! any error into a message and exit code 1.
//!
//! All installation logic lives in the `west_fetch` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
