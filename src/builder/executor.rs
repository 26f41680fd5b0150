//! Writing and running build scripts.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::write_string;
use crate::util::process::ProcessBuilder;

use super::errors::BuildError;
use super::script::CommandSequence;

/// File name of the generated script inside the working directory.
pub const SCRIPT_NAME: &str = "build.bat";

/// Runs a command with the console inherited and returns its exit code.
///
/// `Ok(None)` means the process ended without an exit code.
pub trait ScriptRunner {
    fn run(&self, command: &ProcessBuilder) -> Result<Option<i32>>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ScriptRunner for ShellRunner {
    fn run(&self, command: &ProcessBuilder) -> Result<Option<i32>> {
        let status = command.status()?;
        Ok(status.code())
    }
}

/// Outcome of running the build script or the produced executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub message: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded() -> Self {
        ExecutionResult {
            success: true,
            exit_code: Some(0),
            message: None,
        }
    }

    pub fn failed(exit_code: Option<i32>, message: impl Into<String>) -> Self {
        ExecutionResult {
            success: false,
            exit_code,
            message: Some(message.into()),
        }
    }
}

/// Write `sequence` to `<working_dir>/build.bat` and run it with `cmd /c`.
///
/// Only a failure to write the script is an error. A failing compiler, a
/// missing exit code or a spawn failure is reported in the result.
pub fn execute(
    sequence: &CommandSequence,
    working_dir: &Path,
    runner: &dyn ScriptRunner,
) -> Result<ExecutionResult, BuildError> {
    let script_path = write_script(sequence, working_dir)?;
    tracing::info!("Wrote {}", script_path.display());

    let command = ProcessBuilder::new("cmd")
        .args(["/c", SCRIPT_NAME])
        .cwd(working_dir);

    let result = run_reporting(runner, &command);
    if result.success {
        tracing::info!("Build succeeded");
    } else {
        tracing::warn!(
            "Build failed: {}",
            result.message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(result)
}

/// Write the script without running it, returning its path.
pub fn write_script(sequence: &CommandSequence, working_dir: &Path) -> Result<PathBuf, BuildError> {
    let script_path = working_dir.join(SCRIPT_NAME);
    write_string(&script_path, &sequence.to_script()).map_err(|source| {
        BuildError::WriteScript {
            path: script_path.clone(),
            source,
        }
    })?;
    Ok(script_path)
}

/// Run a produced executable with `cmd /c`.
pub fn run_executable(path: &Path, runner: &dyn ScriptRunner) -> ExecutionResult {
    let command = ProcessBuilder::new("cmd").arg("/c").arg(path);

    let result = run_reporting(runner, &command);
    if !result.success {
        tracing::warn!(
            "Running {} failed: {}",
            path.display(),
            result.message.as_deref().unwrap_or("unknown error")
        );
    }
    result
}

fn run_reporting(runner: &dyn ScriptRunner, command: &ProcessBuilder) -> ExecutionResult {
    tracing::info!("Running `{}`", command.display_command());

    match runner.run(command) {
        Ok(Some(0)) => ExecutionResult::succeeded(),
        Ok(Some(code)) => ExecutionResult::failed(
            Some(code),
            format!("`{}` exited with code {}", command.display_command(), code),
        ),
        Ok(None) => ExecutionResult::failed(
            None,
            format!("`{}` terminated without an exit code", command.display_command()),
        ),
        Err(e) => ExecutionResult::failed(None, format!("{:#}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_sequence, MockRunner};
    use tempfile::TempDir;

    #[test]
    fn test_execute_writes_script_and_runs_cmd() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let seq = sample_sequence();

        let result = execute(&seq, tmp.path(), &runner).unwrap();
        assert_eq!(result, ExecutionResult::succeeded());

        let written = std::fs::read_to_string(tmp.path().join("build.bat")).unwrap();
        assert_eq!(written, seq.to_script());

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, "cmd /c build.bat");
        assert_eq!(calls[0].cwd.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn test_script_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("build.bat"), "echo stale").unwrap();

        let seq = sample_sequence();
        execute(&seq, tmp.path(), &MockRunner::new()).unwrap();

        let written = std::fs::read_to_string(tmp.path().join("build.bat")).unwrap();
        assert!(!written.contains("stale"));
    }

    #[test]
    fn test_nonzero_exit_is_reported_not_raised() {
        let tmp = TempDir::new().unwrap();
        let mut runner = MockRunner::new();
        runner.expect_contains("build.bat", Some(2));

        let result = execute(&sample_sequence(), tmp.path(), &runner).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(2));
        assert!(result.message.unwrap().contains("code 2"));
    }

    #[test]
    fn test_missing_exit_code_is_a_failure() {
        let tmp = TempDir::new().unwrap();
        let mut runner = MockRunner::new();
        runner.expect_contains("build.bat", None);

        let result = execute(&sample_sequence(), tmp.path(), &runner).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, None);
    }

    #[test]
    fn test_spawn_failure_is_a_failure() {
        let tmp = TempDir::new().unwrap();
        let mut runner = MockRunner::new();
        runner.fail_contains("build.bat", "program not found");

        let result = execute(&sample_sequence(), tmp.path(), &runner).unwrap();
        assert!(!result.success);
        assert!(result.message.unwrap().contains("program not found"));
    }

    #[test]
    fn test_unwritable_working_dir_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let runner = MockRunner::new();
        let err = execute(&sample_sequence(), &blocker.join("sub"), &runner).unwrap_err();
        assert!(matches!(err, BuildError::WriteScript { .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_run_executable() {
        let mut runner = MockRunner::new();
        runner.expect_contains("crash.exe", Some(-1073741819));

        let ok = run_executable(Path::new("app.exe"), &runner);
        assert!(ok.success);

        let crashed = run_executable(Path::new("crash.exe"), &runner);
        assert!(!crashed.success);
        assert_eq!(crashed.exit_code, Some(-1073741819));

        let calls = runner.calls();
        assert_eq!(calls[0].command, "cmd /c app.exe");
        assert_eq!(calls[1].command, "cmd /c crash.exe");
    }
}
