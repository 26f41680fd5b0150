//! Configuration file support for clit.
//!
//! clit reads two optional configuration files:
//! - Global: `~/.clit/config.toml` - User-wide defaults
//! - Project: `clit.toml` in the working directory
//!
//! Project config takes precedence over global config, and command-line
//! arguments take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::builder::FlagMap;

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "clit.toml";

/// clit configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Build settings
    pub build: BuildSettings,

    /// Toolchain selection and install locations
    pub toolchain: ToolchainSettings,

    /// Extra compiler flags (flag -> argument, empty for none)
    pub compiler: BTreeMap<String, String>,

    /// Extra linker flags (flag -> argument, empty for none)
    pub linker: BTreeMap<String, String>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSettings {
    /// Source files or glob patterns
    pub sources: Vec<String>,

    /// "release" or "debug"
    pub mode: Option<String>,

    /// "x64" or "x86"
    pub arch: Option<String>,

    /// Object output directory (/Fo)
    pub object_dir: Option<PathBuf>,

    /// Executable output path (/Fe)
    pub binary: Option<PathBuf>,
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainSettings {
    /// Visual Studio suite year, e.g. "2022"
    pub suite: Option<String>,

    /// MSVC / Windows SDK version, e.g. "10.0.22621.0"
    pub sdk: Option<String>,

    /// Visual Studio edition directory, e.g. "Community"
    pub edition: Option<String>,

    /// Visual Studio root directory
    pub vs_root: Option<PathBuf>,

    /// Windows Kits root directory
    pub kits_root: Option<PathBuf>,

    /// Explicit path to vswhere.exe
    pub vswhere: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, or defaults if the file doesn't exist.
    pub fn load_if_exists(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if !other.build.sources.is_empty() {
            self.build.sources = other.build.sources;
        }
        merge_option(&mut self.build.mode, other.build.mode);
        merge_option(&mut self.build.arch, other.build.arch);
        merge_option(&mut self.build.object_dir, other.build.object_dir);
        merge_option(&mut self.build.binary, other.build.binary);

        merge_option(&mut self.toolchain.suite, other.toolchain.suite);
        merge_option(&mut self.toolchain.sdk, other.toolchain.sdk);
        merge_option(&mut self.toolchain.edition, other.toolchain.edition);
        merge_option(&mut self.toolchain.vs_root, other.toolchain.vs_root);
        merge_option(&mut self.toolchain.kits_root, other.toolchain.kits_root);
        merge_option(&mut self.toolchain.vswhere, other.toolchain.vswhere);

        self.compiler.extend(other.compiler);
        self.linker.extend(other.linker);
    }

    /// Extra compiler flags as a [`FlagMap`].
    pub fn compiler_flags(&self) -> FlagMap {
        to_flag_map(&self.compiler)
    }

    /// Extra linker flags as a [`FlagMap`].
    pub fn linker_flags(&self) -> FlagMap {
        to_flag_map(&self.linker)
    }
}

fn to_flag_map(map: &BTreeMap<String, String>) -> FlagMap {
    map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

fn merge_option<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`clit.toml`)
/// 2. Global config (`~/.clit/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_if_exists(global)?);
    }

    config.merge(Config::load_if_exists(project_path)?);

    Ok(config)
}

/// Get the global clit config directory (`~/.clit`).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".clit"))
}

/// Get the global config path (`~/.clit/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`<working_dir>/clit.toml`).
pub fn project_config_path(working_dir: &Path) -> PathBuf {
    working_dir.join(PROJECT_CONFIG_FILE)
}
