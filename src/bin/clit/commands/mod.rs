//! Command implementations

pub mod build;
pub mod completions;
pub mod run;
pub mod script;
pub mod toolchain;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::{BuildArgs, InstallArgs};
use clit::builder::{
    Architecture, BuildRequest, FlagMap, InstallLayout, Mode, SystemProbe, ToolchainVersion,
};
use clit::util::config::{global_config_path, load_config, project_config_path, Config};
use clit::util::fs::expand_sources;

/// A build request assembled from clit.toml layers and the command line.
pub struct PreparedBuild {
    pub request: BuildRequest,
    pub probe: SystemProbe,
}

/// Merge configuration files and arguments into a [`BuildRequest`].
///
/// Mode and architecture are validated before anything touches the disk.
pub fn prepare_build(args: &BuildArgs) -> Result<PreparedBuild> {
    let working_dir = match &args.working_dir {
        Some(dir) => std::path::absolute(dir)
            .with_context(|| format!("invalid working directory: {}", dir.display()))?,
        None => PathBuf::from("."),
    };

    let config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&working_dir),
    )?;

    let mode = if args.release {
        Mode::Release
    } else {
        args.mode
            .as_deref()
            .or(config.build.mode.as_deref())
            .map(str::parse::<Mode>)
            .transpose()?
            .unwrap_or_default()
    };

    let architecture = args
        .arch
        .as_deref()
        .or(config.build.arch.as_deref())
        .map(str::parse::<Architecture>)
        .transpose()?
        .unwrap_or_default();

    let patterns = if args.sources.is_empty() {
        &config.build.sources
    } else {
        &args.sources
    };
    let sources = expand_sources(&working_dir, patterns)?;

    let mut compiler_overrides = config.compiler_flags();
    compiler_overrides.merge(&parse_flag_specs(&args.cflags));
    let mut linker_overrides = config.linker_flags();
    linker_overrides.merge(&parse_flag_specs(&args.lflags));

    let request = BuildRequest {
        sources,
        object_dir: args
            .object_dir
            .as_ref()
            .or(config.build.object_dir.as_ref())
            .cloned(),
        binary_path: args
            .binary
            .as_ref()
            .or(config.build.binary.as_ref())
            .cloned(),
        compiler_overrides,
        linker_overrides,
        suite: args
            .suite
            .as_deref()
            .or(config.toolchain.suite.as_deref())
            .map(ToolchainVersion::from),
        sdk: args
            .sdk
            .as_deref()
            .or(config.toolchain.sdk.as_deref())
            .map(ToolchainVersion::from),
        mode,
        architecture,
        layout: install_layout(&args.install, &config),
        working_dir,
    };

    Ok(PreparedBuild {
        request,
        probe: system_probe(&args.install, &config),
    })
}

/// Install roots: arguments, then clit.toml, then the standard locations.
pub fn install_layout(args: &InstallArgs, config: &Config) -> InstallLayout {
    InstallLayout::default().with_overrides(
        args.vs_root
            .as_deref()
            .or(config.toolchain.vs_root.as_deref()),
        args.edition
            .as_deref()
            .or(config.toolchain.edition.as_deref()),
        args.kits_root
            .as_deref()
            .or(config.toolchain.kits_root.as_deref()),
    )
}

pub fn system_probe(args: &InstallArgs, config: &Config) -> SystemProbe {
    SystemProbe::new().with_vswhere(
        args.vswhere
            .clone()
            .or_else(|| config.toolchain.vswhere.clone()),
    )
}

/// Configuration for commands that have no working directory of their own.
pub fn load_ambient_config() -> Result<Config> {
    load_config(
        global_config_path().as_deref(),
        &project_config_path(Path::new(".")),
    )
}

fn parse_flag_specs(specs: &[String]) -> FlagMap {
    specs
        .iter()
        .map(|spec| FlagMap::parse_spec(spec))
        .collect()
}
