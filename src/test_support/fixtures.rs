//! Test fixtures for common build scenarios.

use std::path::{Path, PathBuf};

use crate::builder::toolchain::{InstallLayout, ToolchainVersion};
use crate::builder::{
    render_command_sequence, resolve_flags, Architecture, BuildConfiguration, BuildRequest,
    CommandSequence, FlagMap, Mode,
};

/// Layout with the stock install roots, independent of the environment.
pub fn stock_layout() -> InstallLayout {
    InstallLayout {
        vs_root: PathBuf::from(r"C:\Program Files\Microsoft Visual Studio"),
        edition: "Community".to_string(),
        kits_root: PathBuf::from(r"C:\Program Files (x86)\Windows Kits\10"),
    }
}

/// A request for `sources` with `dir` as the working directory.
pub fn request_in<S>(dir: &Path, sources: S) -> BuildRequest
where
    S: IntoIterator,
    S::Item: Into<PathBuf>,
{
    BuildRequest {
        working_dir: dir.to_path_buf(),
        layout: stock_layout(),
        ..BuildRequest::new(sources)
    }
}

/// Debug/x64 configuration for `example.cpp` against VS 2022.
pub fn sample_configuration() -> BuildConfiguration {
    let layout = stock_layout();
    let suite = ToolchainVersion::new("2022");
    let sdk = ToolchainVersion::new("14.39.33519.0");
    let (compiler_flags, linker_flags) = resolve_flags(
        Mode::Debug,
        Architecture::X64,
        &FlagMap::new(),
        &FlagMap::new(),
    );
    let object_dir = PathBuf::from(".").join("build").join("x64");

    BuildConfiguration {
        sources: vec![PathBuf::from("example.cpp")],
        binary_path: object_dir.join("example.exe"),
        object_dir,
        working_dir: PathBuf::from("."),
        compiler_flags,
        linker_flags,
        env_script: layout.vcvarsall(&suite),
        include_paths: layout.include_paths(&suite, &sdk),
        lib_paths: layout.lib_paths(&sdk, Architecture::X64),
        suite,
        sdk,
        mode: Mode::Debug,
        architecture: Architecture::X64,
    }
}

/// The rendered script of [`sample_configuration`].
pub fn sample_sequence() -> CommandSequence {
    render_command_sequence(&sample_configuration())
}
