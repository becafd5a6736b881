//! # Project Filter
//!
//! Decides which manifest projects a given target platform actually needs.
//!
//! Every entry is classified once into a [`PackageCategory`] from its name and
//! path; the category plus the [`TargetContext`] then yield an
//! [`Applicability`]:
//!
//! - `hal_<vendor>` packages are required only when the target's allow-list
//!   contains `<vendor>`.
//! - Tooling packages (path starting with `tool`) and hardware test packages
//!   (`nrf_hw_*`) are never required.
//! - A small fixed set of third-party components is intentionally ignored.
//!   These are reported as [`Applicability::Ignored`] rather than
//!   not-applicable so callers can log them distinctly.

use std::fmt;

use crate::manifest::ProjectEntry;

const HAL_PREFIX: &str = "hal_";
const HARDWARE_TEST_PREFIX: &str = "nrf_hw_";
const TOOLING_PATH_PREFIX: &str = "tool";

/// Components that are never installed.
pub const IGNORED_PACKAGES: &[&str] = &["trusted-firmware-m", "trusted-firmware-a"];

/// The platform an installation is performed for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetContext(String);

impl TargetContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// HAL vendor suffixes this platform ships external HAL packages for.
    pub fn hal_vendors(&self) -> &'static [&'static str] {
        hal_vendors_for(&self.0)
    }
}

impl fmt::Display for TargetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn hal_vendors_for(platform: &str) -> &'static [&'static str] {
    match platform {
        "atmelsam" => &["st", "atmel"],
        "chipsalliance" => &["swervolf"],
        "freescalekinetis" => &["st", "nxp"],
        "ststm32" => &["st", "stm32"],
        "siliconlabsefm32" => &["st", "silabs"],
        "nordicnrf51" | "nordicnrf52" => &["st", "nordic"],
        "nxplpc" | "nxpimxrt" | "teensy" => &["st", "nxp"],
        _ => &[],
    }
}

/// Structural category of a manifest project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageCategory {
    Normal,
    /// A hardware abstraction layer for the given vendor.
    Hal { vendor: String },
    ToolingPackage,
    HardwareTestPackage,
}

/// Classify a project by its name and path.
pub fn classify(entry: &ProjectEntry) -> PackageCategory {
    if entry.path.starts_with(TOOLING_PATH_PREFIX) {
        PackageCategory::ToolingPackage
    } else if entry.name.starts_with(HARDWARE_TEST_PREFIX) {
        PackageCategory::HardwareTestPackage
    } else if let Some(vendor) = entry.name.strip_prefix(HAL_PREFIX) {
        PackageCategory::Hal {
            vendor: vendor.to_string(),
        }
    } else {
        PackageCategory::Normal
    }
}

/// Returns `true` for projects on the fixed ignore list.
pub fn is_ignored(entry: &ProjectEntry) -> bool {
    IGNORED_PACKAGES.contains(&entry.name.as_str())
}

/// Why a project was filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// The HAL vendor is not supported by the target.
    UnsupportedHal { vendor: String },
    Tooling,
    HardwareTest,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::UnsupportedHal { vendor } => {
                write!(f, "HAL vendor `{}` is not used by this platform", vendor)
            }
            ExclusionReason::Tooling => f.write_str("tooling package"),
            ExclusionReason::HardwareTest => f.write_str("hardware test package"),
        }
    }
}

/// Outcome of filtering one project for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    Required,
    NotApplicable(ExclusionReason),
    /// On the ignore list; skipped on purpose.
    Ignored,
}

/// Evaluate a project against a target. `None` means no platform was given,
/// which behaves like a platform without external HALs.
pub fn evaluate(entry: &ProjectEntry, target: Option<&TargetContext>) -> Applicability {
    let vendors = target.map(TargetContext::hal_vendors).unwrap_or(&[]);

    match classify(entry) {
        PackageCategory::ToolingPackage => {
            return Applicability::NotApplicable(ExclusionReason::Tooling)
        }
        PackageCategory::HardwareTestPackage => {
            return Applicability::NotApplicable(ExclusionReason::HardwareTest)
        }
        PackageCategory::Hal { vendor } if !vendors.contains(&vendor.as_str()) => {
            return Applicability::NotApplicable(ExclusionReason::UnsupportedHal { vendor })
        }
        PackageCategory::Hal { .. } | PackageCategory::Normal => {}
    }

    if is_ignored(entry) {
        Applicability::Ignored
    } else {
        Applicability::Required
    }
}

/// Returns `true` when the project must be installed for the target.
pub fn is_required(entry: &ProjectEntry, target: Option<&TargetContext>) -> bool {
    evaluate(entry, target) == Applicability::Required
}
