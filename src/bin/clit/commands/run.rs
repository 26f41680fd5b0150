//! `clit run` command

use anyhow::{bail, Result};

use crate::cli::BuildArgs;
use clit::builder::ShellRunner;
use clit::ops::compile_and_run;

use super::prepare_build;

pub fn execute(args: BuildArgs) -> Result<()> {
    let prepared = prepare_build(&args)?;

    let (compilation, run) = compile_and_run(&prepared.request, &prepared.probe, &ShellRunner)?;

    match run {
        None => bail!(
            "build failed: {}",
            compilation
                .result
                .message
                .as_deref()
                .unwrap_or("unknown error")
        ),
        Some(result) if !result.success => bail!(
            "{}",
            result.message.as_deref().unwrap_or("executable failed")
        ),
        Some(_) => Ok(()),
    }
}
