//! clit - build C/C++ sources with MSVC from the command line
//!
//! This crate locates an installed Visual Studio suite and Windows SDK,
//! resolves compiler and linker flags for a build mode and architecture,
//! renders the `cl` invocation as a `build.bat` script and runs it.

pub mod builder;
pub mod ops;
pub mod util;

/// Test utilities and mocks for clit unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides fake implementations of the process runner,
/// the registry and the toolchain probe.
#[cfg(test)]
pub mod test_support;

pub use builder::{
    build_configuration, execute, render_command_sequence, run_executable, Architecture,
    BuildConfiguration, BuildError, BuildRequest, CommandSequence, ExecutionResult, FlagMap,
    Mode,
};
pub use ops::{compile, compile_and_run, Compilation};
