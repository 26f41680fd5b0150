//! Visual Studio and Windows SDK discovery.
//!
//! Suites (Visual Studio releases, identified by year) are found by two
//! independent strategies:
//! 1. `vswhere.exe -latest -products * -format json`
//! 2. Probing `HKLM\SOFTWARE\Microsoft\VisualStudio\<major>.0` in both
//!    registry views
//!
//! MSVC toolset and Windows SDK versions are found by listing the
//! version-named directories under the suite's `VC\Tools\MSVC` directory
//! and under `Windows Kits\10\Include`.
//!
//! Everything that touches the host goes through [`ToolchainProbe`] so that
//! the builder can be driven by [`StaticProbe`] in tests.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::errors::ProbeError;

mod detect;
mod msvc;
mod registry;

pub use detect::{find_vswhere, parse_vswhere_output, SystemProbe, VswhereSource};
pub use msvc::{InstallLayout, DEFAULT_EDITION};
pub use registry::{
    major_for_year, year_for_major, KeyStatus, LocalMachine, RegistryHive, RegistrySource, RegistryView,
    SUITE_REGISTRY_KEYS,
};

/// Version directory names: exactly four dot-separated numbers.
static VERSION_DIR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+$").expect("valid version pattern"));

/// An opaque toolchain version identifier (`2022`, `10.0.22621.0`, ...).
///
/// Only the leading numeric component is ever interpreted, for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ToolchainVersion(String);

impl ToolchainVersion {
    pub fn new(version: impl Into<String>) -> Self {
        ToolchainVersion(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value of the leading run of digits, 0 when there is none.
    pub fn numeric_key(&self) -> u64 {
        let digits: String = self.0.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(0)
    }

    /// Ordering key for suites.
    ///
    /// Known years rank by their product major, so a release that vswhere
    /// reports only by major (`18`) still ranks above `2022`.
    pub fn release_key(&self) -> u64 {
        major_for_year(&self.0).unwrap_or_else(|| self.numeric_key())
    }
}

impl fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolchainVersion {
    fn from(s: &str) -> Self {
        ToolchainVersion::new(s)
    }
}

/// Host capabilities needed to pick a toolchain.
pub trait ToolchainProbe {
    /// Installed suite identifiers, ascending.
    fn enumerate_suites(&self) -> Vec<ToolchainVersion>;

    /// Toolset versions under `suite_install_root` followed by SDK versions
    /// under `sdk_include_root`, in discovery order.
    fn enumerate_sdks(
        &self,
        suite_install_root: &Path,
        sdk_include_root: &Path,
    ) -> Vec<ToolchainVersion>;
}

/// A single strategy for finding installed suites.
pub trait SuiteSource {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Suite identifiers found by this strategy.
    fn suites(&self) -> Result<Vec<ToolchainVersion>, ProbeError>;
}

/// A probe that answers from fixed lists.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    pub suites: Vec<ToolchainVersion>,
    pub sdks: Vec<ToolchainVersion>,
}

impl StaticProbe {
    pub fn new<S, V>(suites: S, sdks: V) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        StaticProbe {
            suites: suites.into_iter().map(ToolchainVersion::new).collect(),
            sdks: sdks.into_iter().map(ToolchainVersion::new).collect(),
        }
    }
}

impl ToolchainProbe for StaticProbe {
    fn enumerate_suites(&self) -> Vec<ToolchainVersion> {
        sort_versions(self.suites.iter().cloned())
    }

    fn enumerate_sdks(&self, _: &Path, _: &Path) -> Vec<ToolchainVersion> {
        self.sdks.clone()
    }
}

/// Run every strategy and return the union of what they found.
///
/// A failing strategy is logged and contributes nothing; the result is
/// deduplicated and ascending by release.
pub fn discover_suite_versions(sources: &[&dyn SuiteSource]) -> Vec<ToolchainVersion> {
    let mut found = HashSet::new();

    for source in sources {
        match source.suites() {
            Ok(suites) => {
                tracing::debug!("{} found suites: {:?}", source.name(), suites);
                found.extend(suites);
            }
            Err(ProbeError::RegistryUnsupported) => {
                tracing::debug!("{}: registry not available, skipping", source.name());
            }
            Err(e) => {
                tracing::warn!("{} discovery yielded nothing: {}", source.name(), e);
            }
        }
    }

    sort_versions(found)
}

fn sort_versions(versions: impl IntoIterator<Item = ToolchainVersion>) -> Vec<ToolchainVersion> {
    let mut versions: Vec<_> = versions
        .into_iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    versions.sort_by(|a, b| {
        a.release_key()
            .cmp(&b.release_key())
            .then_with(|| a.cmp(b))
    });
    versions
}

/// List toolset versions under `suite_install_root` followed by SDK versions
/// under `sdk_include_root`.
///
/// Only directories named like `14.39.33519.0` count. A missing root is
/// logged and contributes nothing.
pub fn discover_msvc_sdk_versions(
    suite_install_root: &Path,
    sdk_include_root: &Path,
) -> Vec<ToolchainVersion> {
    let mut versions = scan_version_dirs(suite_install_root);
    if versions.is_empty() {
        tracing::debug!("no MSVC versions in {}", suite_install_root.display());
    } else {
        tracing::debug!(
            "MSVC versions in {}: {:?}",
            suite_install_root.display(),
            versions
        );
    }

    let sdks = scan_version_dirs(sdk_include_root);
    if sdks.is_empty() {
        tracing::debug!("no Windows SDK versions in {}", sdk_include_root.display());
    } else {
        tracing::debug!(
            "Windows SDK versions in {}: {:?}",
            sdk_include_root.display(),
            sdks
        );
    }

    versions.extend(sdks);
    versions
}

fn scan_version_dirs(root: &Path) -> Vec<ToolchainVersion> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("cannot list {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| VERSION_DIR_PATTERN.is_match(name))
        .map(ToolchainVersion::new)
        .collect()
}

/// Pick the newest suite by [`ToolchainVersion::release_key`].
pub fn select_suite(suites: &[ToolchainVersion]) -> Option<&ToolchainVersion> {
    suites.iter().max_by(|a, b| {
        a.release_key()
            .cmp(&b.release_key())
            .then_with(|| a.cmp(b))
    })
}

/// Pick the last SDK in discovery order.
///
/// Toolset and SDK names live in different numbering schemes, so the list is
/// not sorted; the SDK directory listed last wins.
pub fn select_sdk(sdks: &[ToolchainVersion]) -> Option<&ToolchainVersion> {
    sdks.last()
}
