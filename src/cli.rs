//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::WriteStyle;
use west_fetch::output::OutputConfig;

use crate::commands;

/// West Fetch - Install the packages listed in a west manifest
#[derive(Parser, Debug)]
#[command(name = "west-fetch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install missing packages and refresh drifted ones
    Install(commands::install::InstallArgs),

    /// Show which packages are required, installed or drifted
    Status(commands::status::StatusArgs),

    /// Remove the package directory and its state file
    Clean(commands::clean::CleanArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Commands {
    /// Log level implied by command flags, overriding `--log-level`.
    fn log_level_override(&self) -> Option<&'static str> {
        match self {
            Commands::Install(args) if args.quiet => Some("error"),
            Commands::Install(args) if args.verbose => Some("debug"),
            _ => None,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        let level = self
            .command
            .log_level_override()
            .unwrap_or(self.log_level.as_str());
        init_logging(level, &output);

        match self.command {
            Commands::Install(args) => commands::install::execute(args, &output),
            Commands::Status(args) => commands::status::execute(args, &output),
            Commands::Clean(args) => commands::clean::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG`, when set, refines the level chosen on the command line.
fn init_logging(level: &str, output: &OutputConfig) {
    let style = if output.use_color {
        WriteStyle::Auto
    } else {
        WriteStyle::Never
    };

    let _ = env_logger::Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .write_style(style)
        .try_init();
}
