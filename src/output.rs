//! # Output Configuration
//!
//! Console styling for the `west-fetch` binary. Color and emoji are used only
//! when the terminal and the user allow it:
//!
//! - `--color=never|always|auto` on the command line
//! - `NO_COLOR` set to anything disables colors
//! - `CLICOLOR=0` disables colors, `CLICOLOR_FORCE=1` forces them
//! - `TERM=dumb` disables colors
//!
//! ```rust,ignore
//! use west_fetch::output::{OutputConfig, emoji};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Installing packages", emoji(&config, "📦", "[INSTALL]"));
//! ```

use std::env;

use console::style;

use crate::filter::Applicability;

/// Whether colors and emojis may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag value (`always`, `never` or `auto`)
    /// against the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[doc(hidden)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[doc(hidden)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Picks the emoji when colors are on, the plain marker otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Short label for a project's applicability, colored when allowed.
pub fn applicability_label(config: &OutputConfig, applicability: &Applicability) -> String {
    let (text, color) = match applicability {
        Applicability::Required => ("required", console::Color::Green),
        Applicability::NotApplicable(_) => ("skipped", console::Color::Yellow),
        Applicability::Ignored => ("ignored", console::Color::Cyan),
    };
    if config.use_color {
        style(text).fg(color).to_string()
    } else {
        text.to_string()
    }
}

/// Marks drifted revisions, e.g. `v1 -> v2`.
pub fn drift_label(config: &OutputConfig, installed: &str, declared: &str) -> String {
    let label = format!("{} -> {}", installed, declared);
    if config.use_color {
        style(label).red().bold().to_string()
    } else {
        label
    }
}
