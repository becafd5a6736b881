//! # Completions Command Implementation
//!
//! Prints a shell completion script for `west-fetch` to stdout, generated by
//! `clap_complete`.
//!
//! ```bash
//! west-fetch completions bash > ~/.local/share/bash-completion/completions/west-fetch
//! west-fetch completions zsh > ~/.zfunc/_west-fetch
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "west-fetch", &mut io::stdout());
    Ok(())
}
