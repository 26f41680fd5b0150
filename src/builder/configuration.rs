//! Resolution of a build request into a complete build configuration.

use std::path::{Path, PathBuf};

use crate::util::fs::{ensure_dir, file_stem};

use super::errors::BuildError;
use super::flags::{resolve_flags, Architecture, FlagMap, Mode};
use super::toolchain::{select_sdk, select_suite, InstallLayout, ToolchainProbe, ToolchainVersion};

/// What the caller asked for. Anything left `None` is defaulted or discovered.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Source files, in command-line order
    pub sources: Vec<PathBuf>,
    /// Object output directory (/Fo)
    pub object_dir: Option<PathBuf>,
    /// Executable output path (/Fe)
    pub binary_path: Option<PathBuf>,
    /// Directory the script is written to and run from
    pub working_dir: PathBuf,
    pub compiler_overrides: FlagMap,
    pub linker_overrides: FlagMap,
    /// Pinned Visual Studio suite, e.g. `2022`
    pub suite: Option<ToolchainVersion>,
    /// Pinned MSVC / Windows SDK version
    pub sdk: Option<ToolchainVersion>,
    pub mode: Mode,
    pub architecture: Architecture,
    pub layout: InstallLayout,
}

impl BuildRequest {
    pub fn new(sources: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        BuildRequest {
            sources: sources.into_iter().map(Into::into).collect(),
            working_dir: PathBuf::from("."),
            ..Default::default()
        }
    }
}

/// Everything needed to render a build script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub sources: Vec<PathBuf>,
    pub object_dir: PathBuf,
    pub binary_path: PathBuf,
    /// Absolute
    pub working_dir: PathBuf,
    pub compiler_flags: FlagMap,
    pub linker_flags: FlagMap,
    pub suite: ToolchainVersion,
    pub sdk: ToolchainVersion,
    pub mode: Mode,
    pub architecture: Architecture,
    /// `vcvarsall.bat` of the selected suite
    pub env_script: PathBuf,
    pub include_paths: Vec<PathBuf>,
    pub lib_paths: Vec<PathBuf>,
}

/// Resolve a request into a [`BuildConfiguration`].
///
/// The working directory is made absolute and relative output paths are
/// taken relative to it. Creates the object directory and, for unpinned
/// versions, asks `probe`. Nothing else touches the host.
pub fn build_configuration(
    request: &BuildRequest,
    probe: &dyn ToolchainProbe,
) -> Result<BuildConfiguration, BuildError> {
    if request.sources.is_empty() {
        return Err(BuildError::NoSources);
    }

    let (compiler_flags, linker_flags) = resolve_flags(
        request.mode,
        request.architecture,
        &request.compiler_overrides,
        &request.linker_overrides,
    );

    // The script runs from the working directory, so every output path is
    // anchored there rather than at the caller's current directory.
    let working_dir = absolute_working_dir(&request.working_dir)?;
    let object_dir = match &request.object_dir {
        Some(dir) => working_dir.join(dir),
        None => working_dir
            .join("build")
            .join(request.architecture.as_str()),
    };
    let binary_path = match &request.binary_path {
        Some(path) => working_dir.join(path),
        None => default_binary_path(&object_dir, &request.sources),
    };

    ensure_dir(&object_dir).map_err(|source| BuildError::CreateDir {
        path: object_dir.clone(),
        source,
    })?;

    let suite = match &request.suite {
        Some(suite) => suite.clone(),
        None => {
            let suites = probe.enumerate_suites();
            let suite = select_suite(&suites).ok_or(BuildError::NoSuiteFound)?.clone();
            if suites.len() > 1 {
                tracing::info!("found Visual Studio {:?}, using {}", suites, suite);
            }
            suite
        }
    };

    let layout = &request.layout;
    let sdk = match &request.sdk {
        Some(sdk) => sdk.clone(),
        None => {
            let sdks = probe.enumerate_sdks(&layout.msvc_tools_root(&suite), &layout.sdk_include_root());
            let sdk = select_sdk(&sdks)
                .ok_or_else(|| BuildError::NoSdkFound {
                    suite: suite.to_string(),
                })?
                .clone();
            if sdks.len() > 1 {
                tracing::info!("found SDK versions {:?}, using {}", sdks, sdk);
            }
            sdk
        }
    };

    tracing::info!(
        "Using Visual Studio {} ({}), SDK {}, {} {}",
        suite,
        layout.edition,
        sdk,
        request.mode,
        request.architecture
    );

    Ok(BuildConfiguration {
        sources: request.sources.clone(),
        object_dir,
        binary_path,
        working_dir,
        compiler_flags,
        linker_flags,
        env_script: layout.vcvarsall(&suite),
        include_paths: layout.include_paths(&suite, &sdk),
        lib_paths: layout.lib_paths(&sdk, request.architecture),
        suite,
        sdk,
        mode: request.mode,
        architecture: request.architecture,
    })
}

fn absolute_working_dir(dir: &Path) -> Result<PathBuf, BuildError> {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    std::path::absolute(dir).map_err(|source| BuildError::WorkingDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// `<object_dir>/<stem of the first source>.exe`
fn default_binary_path(object_dir: &Path, sources: &[PathBuf]) -> PathBuf {
    let stem = sources
        .first()
        .map(|s| file_stem(s))
        .unwrap_or_else(|| "a".to_string());
    object_dir.join(format!("{}.exe", stem))
}
