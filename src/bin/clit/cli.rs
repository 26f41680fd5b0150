//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// clit - build C/C++ sources with MSVC from the command line
#[derive(Parser)]
#[command(name = "clit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate build.bat and run it
    Build(BuildArgs),

    /// Build, then run the produced executable
    Run(BuildArgs),

    /// Print the generated build script without running it
    Script(BuildArgs),

    /// Inspect installed Visual Studio suites and SDKs
    Toolchain(ToolchainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Source files or glob patterns (defaults to `[build] sources` in clit.toml)
    pub sources: Vec<String>,

    /// Directory the script is written to and run from
    #[arg(short = 'C', long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Object file output directory (/Fo)
    #[arg(long, value_name = "DIR")]
    pub object_dir: Option<PathBuf>,

    /// Executable output path (/Fe)
    #[arg(long, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Build mode: release or debug
    #[arg(long, conflicts_with = "release")]
    pub mode: Option<String>,

    /// Shorthand for --mode release
    #[arg(short, long)]
    pub release: bool,

    /// Target architecture: x64 or x86
    #[arg(long)]
    pub arch: Option<String>,

    /// Visual Studio suite year, e.g. 2022 (skips discovery)
    #[arg(long)]
    pub suite: Option<String>,

    /// MSVC / Windows SDK version, e.g. 10.0.22621.0 (skips discovery)
    #[arg(long)]
    pub sdk: Option<String>,

    #[command(flatten)]
    pub install: InstallArgs,

    /// Extra compiler flag, "<flag> [value]" (repeatable)
    #[arg(long = "cflag", value_name = "FLAG", allow_hyphen_values = true)]
    pub cflags: Vec<String>,

    /// Extra linker flag, "<flag> [value]" (repeatable)
    #[arg(long = "lflag", value_name = "FLAG", allow_hyphen_values = true)]
    pub lflags: Vec<String>,
}

/// Where Visual Studio and the Windows Kits live.
#[derive(Args, Clone, Default)]
pub struct InstallArgs {
    /// Visual Studio edition directory (Community, Professional, BuildTools, ...)
    #[arg(long)]
    pub edition: Option<String>,

    /// Visual Studio root directory
    #[arg(long, value_name = "DIR")]
    pub vs_root: Option<PathBuf>,

    /// Windows Kits root directory
    #[arg(long, value_name = "DIR")]
    pub kits_root: Option<PathBuf>,

    /// Path to vswhere.exe
    #[arg(long, value_name = "PATH", env = "CLIT_VSWHERE")]
    pub vswhere: Option<PathBuf>,
}

#[derive(Args)]
pub struct ToolchainArgs {
    #[command(subcommand)]
    pub command: ToolchainCommands,
}

#[derive(Subcommand)]
pub enum ToolchainCommands {
    /// List installed Visual Studio suites
    Suites(SuitesArgs),

    /// List MSVC toolset and Windows SDK versions for a suite
    Sdks(SdksArgs),
}

#[derive(Args)]
pub struct SuitesArgs {
    /// Path to vswhere.exe
    #[arg(long, value_name = "PATH", env = "CLIT_VSWHERE")]
    pub vswhere: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SdksArgs {
    /// Suite to list versions for (defaults to the newest installed)
    #[arg(long)]
    pub suite: Option<String>,

    #[command(flatten)]
    pub install: InstallArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
