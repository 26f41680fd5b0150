//! MSVC build driver.
//!
//! This module turns a [`BuildRequest`] into a [`BuildConfiguration`],
//! renders it as a `build.bat` script and runs it.

pub mod configuration;
pub mod errors;
pub mod executor;
pub mod flags;
pub mod script;
pub mod toolchain;

pub use configuration::{build_configuration, BuildConfiguration, BuildRequest};
pub use errors::{BuildError, ProbeError};
pub use executor::{
    execute, run_executable, write_script, ExecutionResult, ScriptRunner, ShellRunner,
    SCRIPT_NAME,
};
pub use flags::{resolve_flags, Architecture, FlagMap, Mode};
pub use script::{render_command_sequence, CommandSequence};
pub use toolchain::{
    InstallLayout, StaticProbe, SystemProbe, ToolchainProbe, ToolchainVersion,
};
