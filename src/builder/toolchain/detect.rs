//! Host probing: vswhere.exe and the system probe that combines strategies.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::builder::errors::ProbeError;
use crate::util::process::ProcessBuilder;

use super::registry::{year_for_major, RegistrySource};
use super::{
    discover_msvc_sdk_versions, discover_suite_versions, SuiteSource, ToolchainProbe,
    ToolchainVersion,
};

/// Probe backed by the real host: vswhere, the registry and the filesystem.
#[derive(Debug, Clone, Default)]
pub struct SystemProbe {
    vswhere: Option<PathBuf>,
}

impl SystemProbe {
    pub fn new() -> Self {
        SystemProbe { vswhere: None }
    }

    /// Use a specific vswhere.exe instead of searching for one.
    pub fn with_vswhere(mut self, path: Option<PathBuf>) -> Self {
        self.vswhere = path;
        self
    }
}

impl ToolchainProbe for SystemProbe {
    fn enumerate_suites(&self) -> Vec<ToolchainVersion> {
        let vswhere = VswhereSource::new(self.vswhere.clone());
        let registry = RegistrySource::local_machine();
        discover_suite_versions(&[&vswhere, &registry])
    }

    fn enumerate_sdks(
        &self,
        suite_install_root: &Path,
        sdk_include_root: &Path,
    ) -> Vec<ToolchainVersion> {
        discover_msvc_sdk_versions(suite_install_root, sdk_include_root)
    }
}

/// Finds suites by asking `vswhere.exe` for the latest installation.
#[derive(Debug, Clone, Default)]
pub struct VswhereSource {
    path: Option<PathBuf>,
}

impl VswhereSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        VswhereSource { path }
    }

    fn locate(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) if path.exists() => Some(path.clone()),
            Some(path) => {
                tracing::warn!("configured vswhere.exe not found: {}", path.display());
                None
            }
            None => find_vswhere(),
        }
    }
}

impl SuiteSource for VswhereSource {
    fn name(&self) -> &str {
        "vswhere"
    }

    fn suites(&self) -> Result<Vec<ToolchainVersion>, ProbeError> {
        let vswhere = self.locate().ok_or(ProbeError::ToolNotFound)?;
        tracing::debug!("Found vswhere at: {}", vswhere.display());

        let pb = ProcessBuilder::new(&vswhere).args(["-latest", "-products", "*", "-format", "json"]);
        let output = pb.exec().map_err(|e| ProbeError::Spawn {
            program: pb.display_command(),
            reason: format!("{:#}", e),
        })?;

        if !output.status.success() {
            return Err(ProbeError::ToolFailed {
                program: pb.display_command(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_vswhere_output(&output.stdout)
    }
}

/// One installation record from `vswhere -format json`.
#[derive(Debug, Deserialize)]
struct VswhereInstance {
    #[serde(rename = "installationVersion", default)]
    installation_version: Option<String>,
}

/// Extract suite identifiers from `vswhere -format json` output.
///
/// The leading component of `installationVersion` (`17` in `17.9.34607.119`)
/// is translated to the suite year when it is a known release, so that the
/// result lines up with registry discovery.
pub fn parse_vswhere_output(stdout: &[u8]) -> Result<Vec<ToolchainVersion>, ProbeError> {
    let instances: Vec<VswhereInstance> = serde_json::from_slice(stdout)?;

    Ok(instances
        .into_iter()
        .filter_map(|instance| instance.installation_version)
        .filter_map(|version| {
            let major = version.split('.').next().unwrap_or_default().to_string();
            if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
                tracing::debug!("ignoring installationVersion `{}`", version);
                return None;
            }
            let id = year_for_major(&major).map(str::to_string).unwrap_or(major);
            Some(ToolchainVersion::new(id))
        })
        .collect())
}

/// Find vswhere.exe in its standard location or on PATH.
pub fn find_vswhere() -> Option<PathBuf> {
    let program_files_x86 = std::env::var("ProgramFiles(x86)")
        .unwrap_or_else(|_| "C:\\Program Files (x86)".to_string());

    let standard_path = PathBuf::from(&program_files_x86)
        .join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe");

    if standard_path.exists() {
        return Some(standard_path);
    }

    which::which("vswhere").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vswhere_output() {
        let json = br#"[
            {
                "instanceId": "a1b2c3",
                "installationPath": "C:\\Program Files\\Microsoft Visual Studio\\2022\\Community",
                "installationVersion": "17.9.34607.119",
                "isPrerelease": false
            },
            {
                "instanceId": "d4e5f6",
                "installationVersion": "16.11.34601.136"
            }
        ]"#;

        let suites = parse_vswhere_output(json).unwrap();
        assert_eq!(
            suites,
            vec![ToolchainVersion::new("2022"), ToolchainVersion::new("2019")]
        );
    }

    #[test]
    fn test_unknown_major_kept_verbatim() {
        let json = br#"[{"installationVersion": "18.0.1.2"}]"#;
        assert_eq!(
            parse_vswhere_output(json).unwrap(),
            vec![ToolchainVersion::new("18")]
        );
    }

    #[test]
    fn test_records_without_version_are_skipped() {
        let json = br#"[{"instanceId": "x"}, {"installationVersion": ""}, {"installationVersion": "beta"}]"#;
        assert!(parse_vswhere_output(json).unwrap().is_empty());
        assert!(parse_vswhere_output(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_output() {
        assert!(matches!(
            parse_vswhere_output(b"Visual Studio Locator version 3.1.7"),
            Err(ProbeError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_vswhere_output(br#"{"installationVersion": "17.0"}"#),
            Err(ProbeError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_missing_configured_vswhere() {
        let source = VswhereSource::new(Some(PathBuf::from("/nonexistent/vswhere.exe")));
        assert!(matches!(source.suites(), Err(ProbeError::ToolNotFound)));
    }
}
