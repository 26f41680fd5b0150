//! Visual Studio and Windows Kits directory layout.
//!
//! All paths the generated script references are derived here from the
//! install roots, the selected versions and the target architecture.

use std::path::{Path, PathBuf};

use crate::builder::flags::Architecture;

use super::ToolchainVersion;

/// Default Visual Studio edition directory.
pub const DEFAULT_EDITION: &str = "Community";

/// Where Visual Studio and the Windows Kits are installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// Visual Studio root, e.g. `C:\Program Files\Microsoft Visual Studio`
    pub vs_root: PathBuf,
    /// Edition directory below the suite year (Community, Professional, ...)
    pub edition: String,
    /// Windows Kits root, e.g. `C:\Program Files (x86)\Windows Kits\10`
    pub kits_root: PathBuf,
}

impl Default for InstallLayout {
    fn default() -> Self {
        let program_files =
            std::env::var("ProgramFiles").unwrap_or_else(|_| "C:\\Program Files".to_string());
        let program_files_x86 = std::env::var("ProgramFiles(x86)")
            .unwrap_or_else(|_| "C:\\Program Files (x86)".to_string());

        InstallLayout {
            vs_root: PathBuf::from(program_files).join("Microsoft Visual Studio"),
            edition: DEFAULT_EDITION.to_string(),
            kits_root: PathBuf::from(program_files_x86)
                .join("Windows Kits")
                .join("10"),
        }
    }
}

impl InstallLayout {
    /// Installation directory of one suite, e.g. `...\2022\Community`.
    pub fn suite_dir(&self, suite: &ToolchainVersion) -> PathBuf {
        self.vs_root.join(suite.as_str()).join(&self.edition)
    }

    /// Directory holding the MSVC toolset versions of a suite.
    pub fn msvc_tools_root(&self, suite: &ToolchainVersion) -> PathBuf {
        self.suite_dir(suite).join("VC").join("Tools").join("MSVC")
    }

    /// Directory holding the Windows SDK header versions.
    pub fn sdk_include_root(&self) -> PathBuf {
        self.kits_root.join("Include")
    }

    /// The suite's environment script.
    pub fn vcvarsall(&self, suite: &ToolchainVersion) -> PathBuf {
        self.suite_dir(suite)
            .join("VC")
            .join("Auxiliary")
            .join("Build")
            .join("vcvarsall.bat")
    }

    /// Header search directories for a suite/SDK pair.
    pub fn include_paths(&self, suite: &ToolchainVersion, sdk: &ToolchainVersion) -> Vec<PathBuf> {
        let sdk_include = self.sdk_include_root().join(sdk.as_str());

        let mut paths = vec![self.msvc_tools_root(suite).join(sdk.as_str()).join("include")];
        paths.extend(
            ["ucrt", "shared", "um", "winrt"]
                .iter()
                .map(|sub| sdk_include.join(sub)),
        );
        paths
    }

    /// Library search directories for an SDK and architecture.
    pub fn lib_paths(&self, sdk: &ToolchainVersion, arch: Architecture) -> Vec<PathBuf> {
        let sdk_lib = self.kits_root.join("Lib").join(sdk.as_str());
        vec![
            sdk_lib.join("ucrt").join(arch.as_str()),
            sdk_lib.join("um").join(arch.as_str()),
            self.kits_root
                .join("bin")
                .join(sdk.as_str())
                .join(arch.as_str()),
        ]
    }

    /// Replace the roots with the given overrides, keeping defaults otherwise.
    pub fn with_overrides(
        mut self,
        vs_root: Option<&Path>,
        edition: Option<&str>,
        kits_root: Option<&Path>,
    ) -> Self {
        if let Some(root) = vs_root {
            self.vs_root = root.to_path_buf();
        }
        if let Some(edition) = edition {
            self.edition = edition.to_string();
        }
        if let Some(root) = kits_root {
            self.kits_root = root.to_path_buf();
        }
        self
    }
}
