//! `clit script` command
//!
//! Prints the script `clit build` would run, without writing build.bat or
//! running anything.

use anyhow::Result;

use crate::cli::BuildArgs;
use clit::builder::{build_configuration, render_command_sequence};

use super::prepare_build;

pub fn execute(args: BuildArgs) -> Result<()> {
    let prepared = prepare_build(&args)?;

    let configuration = build_configuration(&prepared.request, &prepared.probe)?;
    print!("{}", render_command_sequence(&configuration));

    Ok(())
}
