//! `clit toolchain` command

use anyhow::Result;

use crate::cli::{InstallArgs, SdksArgs, SuitesArgs, ToolchainArgs, ToolchainCommands};
use clit::builder::toolchain::{select_sdk, select_suite};
use clit::builder::{BuildError, ToolchainProbe, ToolchainVersion};

use super::{install_layout, load_ambient_config, system_probe};

pub fn execute(args: ToolchainArgs) -> Result<()> {
    match args.command {
        ToolchainCommands::Suites(args) => list_suites(args),
        ToolchainCommands::Sdks(args) => list_sdks(args),
    }
}

fn list_suites(args: SuitesArgs) -> Result<()> {
    let config = load_ambient_config()?;
    let install = InstallArgs {
        vswhere: args.vswhere,
        ..Default::default()
    };
    let probe = system_probe(&install, &config);

    let suites = probe.enumerate_suites();
    let selected = select_suite(&suites);
    print_versions(&suites, selected, args.json)
}

fn list_sdks(args: SdksArgs) -> Result<()> {
    let config = load_ambient_config()?;
    let probe = system_probe(&args.install, &config);
    let layout = install_layout(&args.install, &config);

    let suite = match args.suite.as_deref().or(config.toolchain.suite.as_deref()) {
        Some(suite) => ToolchainVersion::from(suite),
        None => select_suite(&probe.enumerate_suites())
            .cloned()
            .ok_or(BuildError::NoSuiteFound)?,
    };

    let sdks = probe.enumerate_sdks(&layout.msvc_tools_root(&suite), &layout.sdk_include_root());
    let selected = select_sdk(&sdks);
    print_versions(&sdks, selected, args.json)
}

fn print_versions(
    versions: &[ToolchainVersion],
    selected: Option<&ToolchainVersion>,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(versions)?);
        return Ok(());
    }

    if versions.is_empty() {
        eprintln!("No versions found");
        return Ok(());
    }

    for version in versions {
        if selected.is_some_and(|s| std::ptr::eq(s, version)) {
            println!("{} (selected)", version);
        } else {
            println!("{}", version);
        }
    }
    Ok(())
}
