//! Implementation of `clit build` and `clit run`.

use std::path::PathBuf;

use crate::builder::{
    build_configuration, execute, render_command_sequence, run_executable, BuildConfiguration,
    BuildError, BuildRequest, ExecutionResult, ScriptRunner, ToolchainProbe, SCRIPT_NAME,
};

/// A configured, rendered and executed build.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub configuration: BuildConfiguration,
    /// The `build.bat` that was written
    pub script_path: PathBuf,
    pub result: ExecutionResult,
}

impl Compilation {
    pub fn succeeded(&self) -> bool {
        self.result.success
    }
}

/// Configure, render and execute a build.
pub fn compile(
    request: &BuildRequest,
    probe: &dyn ToolchainProbe,
    runner: &dyn ScriptRunner,
) -> Result<Compilation, BuildError> {
    let configuration = build_configuration(request, probe)?;
    let sequence = render_command_sequence(&configuration);
    let result = execute(&sequence, &configuration.working_dir, runner)?;

    Ok(Compilation {
        script_path: configuration.working_dir.join(SCRIPT_NAME),
        configuration,
        result,
    })
}

/// Compile, then run the produced executable if the build succeeded.
pub fn compile_and_run(
    request: &BuildRequest,
    probe: &dyn ToolchainProbe,
    runner: &dyn ScriptRunner,
) -> Result<(Compilation, Option<ExecutionResult>), BuildError> {
    let compilation = compile(request, probe, runner)?;

    if !compilation.succeeded() {
        tracing::warn!("Skipping run because the build failed");
        return Ok((compilation, None));
    }

    let binary = &compilation.configuration.binary_path;
    tracing::info!("Running {}", binary.display());
    let run = run_executable(binary, runner);
    Ok((compilation, Some(run)))
}
