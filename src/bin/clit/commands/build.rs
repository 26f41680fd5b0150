//! `clit build` command

use anyhow::{bail, Result};

use crate::cli::BuildArgs;
use clit::builder::ShellRunner;
use clit::ops::compile;

use super::prepare_build;

pub fn execute(args: BuildArgs) -> Result<()> {
    let prepared = prepare_build(&args)?;

    let compilation = compile(&prepared.request, &prepared.probe, &ShellRunner)?;

    if !compilation.succeeded() {
        bail!(
            "build failed: {}",
            compilation
                .result
                .message
                .as_deref()
                .unwrap_or("unknown error")
        );
    }

    eprintln!(
        "    Finished {}",
        compilation.configuration.binary_path.display()
    );
    Ok(())
}
