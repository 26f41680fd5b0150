//! Test utilities and mocks for clit unit tests.
//!
//! This module provides fake implementations of the host seams the builder
//! depends on: the process runner, the registry and the toolchain probe.
//!
//! # Example
//!
//! ```rust,ignore
//! use clit::test_support::{MockRunner, request_in};
//!
//! #[test]
//! fn test_example() {
//!     let mut runner = MockRunner::new();
//!     runner.expect_contains("build.bat", Some(2));
//!
//!     // Drive `execute` or `compile` with `&runner`...
//! }
//! ```

pub mod fixtures;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::builder::errors::ProbeError;
use crate::builder::toolchain::{
    KeyStatus, RegistryHive, RegistryView, ToolchainProbe, ToolchainVersion,
};
use crate::builder::ScriptRunner;
use crate::util::process::ProcessBuilder;

pub use fixtures::*;

/// Pattern for matching commands in [`MockRunner`].
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// What a matched command does.
#[derive(Debug, Clone)]
enum MockOutcome {
    Exit(Option<i32>),
    SpawnError(String),
}

/// A command the runner was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Program and arguments joined by spaces
    pub command: String,
    pub cwd: Option<PathBuf>,
}

/// Mock script runner that records every command.
///
/// Unmatched commands exit with code 0.
#[derive(Debug, Default)]
pub struct MockRunner {
    expectations: Vec<(CommandPattern, MockOutcome)>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `substring` exit with `code`.
    pub fn expect_contains(&mut self, substring: &str, code: Option<i32>) -> &mut Self {
        self.expectations.push((
            CommandPattern::Contains(substring.to_string()),
            MockOutcome::Exit(code),
        ));
        self
    }

    /// Commands equal to `cmd` exit with `code`.
    pub fn expect(&mut self, cmd: &str, code: Option<i32>) -> &mut Self {
        self.expectations.push((
            CommandPattern::Exact(cmd.to_string()),
            MockOutcome::Exit(code),
        ));
        self
    }

    /// Commands containing `substring` fail to spawn.
    pub fn fail_contains(&mut self, substring: &str, reason: &str) -> &mut Self {
        self.expectations.push((
            CommandPattern::Contains(substring.to_string()),
            MockOutcome::SpawnError(reason.to_string()),
        ));
        self
    }

    /// Every command exits with `code` unless an earlier expectation matches.
    pub fn set_default(&mut self, code: Option<i32>) -> &mut Self {
        self.expectations
            .push((CommandPattern::Any, MockOutcome::Exit(code)));
        self
    }

    /// Get all commands that were run.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl ScriptRunner for MockRunner {
    fn run(&self, command: &ProcessBuilder) -> Result<Option<i32>> {
        let full_cmd = command.display_command();
        self.calls.borrow_mut().push(RecordedCall {
            command: full_cmd.clone(),
            cwd: command.get_cwd().map(Path::to_path_buf),
        });

        let outcome = self
            .expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(&full_cmd))
            .map(|(_, outcome)| outcome.clone());

        match outcome {
            Some(MockOutcome::Exit(code)) => Ok(code),
            Some(MockOutcome::SpawnError(reason)) => {
                Err(anyhow!("failed to execute `{}`: {}", full_cmd, reason))
            }
            None => Ok(Some(0)),
        }
    }
}

/// In-memory registry hive that records which keys were opened.
///
/// Keys not configured are [`KeyStatus::Missing`].
#[derive(Debug, Default)]
pub struct FakeHive {
    keys: HashMap<(String, RegistryView), KeyStatus>,
    opened: RefCell<Vec<(String, RegistryView)>>,
}

impl FakeHive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` present in `view`.
    pub fn with_key(self, path: &str, view: RegistryView) -> Self {
        self.with_status(path, view, KeyStatus::Present)
    }

    /// Make opening `path` in `view` report `status`.
    pub fn with_status(mut self, path: &str, view: RegistryView, status: KeyStatus) -> Self {
        self.keys.insert((path.to_string(), view), status);
        self
    }

    /// Keys opened so far, in order.
    pub fn opened(&self) -> Vec<(String, RegistryView)> {
        self.opened.borrow().clone()
    }
}

impl RegistryHive for FakeHive {
    fn open(&self, path: &str, view: RegistryView) -> Result<KeyStatus, ProbeError> {
        self.opened.borrow_mut().push((path.to_string(), view));
        Ok(self
            .keys
            .get(&(path.to_string(), view))
            .cloned()
            .unwrap_or(KeyStatus::Missing))
    }
}

/// Wraps a probe and counts the queries made through it.
#[derive(Debug)]
pub struct RecordingProbe<P> {
    inner: P,
    suite_queries: Cell<usize>,
    sdk_roots: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl<P: ToolchainProbe> RecordingProbe<P> {
    pub fn new(inner: P) -> Self {
        RecordingProbe {
            inner,
            suite_queries: Cell::new(0),
            sdk_roots: RefCell::new(Vec::new()),
        }
    }

    pub fn suite_queries(&self) -> usize {
        self.suite_queries.get()
    }

    pub fn sdk_queries(&self) -> usize {
        self.sdk_roots.borrow().len()
    }

    /// Roots passed to each `enumerate_sdks` call.
    pub fn sdk_roots(&self) -> Vec<(PathBuf, PathBuf)> {
        self.sdk_roots.borrow().clone()
    }
}

impl<P: ToolchainProbe> ToolchainProbe for RecordingProbe<P> {
    fn enumerate_suites(&self) -> Vec<ToolchainVersion> {
        self.suite_queries.set(self.suite_queries.get() + 1);
        self.inner.enumerate_suites()
    }

    fn enumerate_sdks(
        &self,
        suite_install_root: &Path,
        sdk_include_root: &Path,
    ) -> Vec<ToolchainVersion> {
        self.sdk_roots.borrow_mut().push((
            suite_install_root.to_path_buf(),
            sdk_include_root.to_path_buf(),
        ));
        self.inner.enumerate_sdks(suite_install_root, sdk_include_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_and_matches() {
        let mut runner = MockRunner::new();
        runner
            .expect("cmd /c build.bat", Some(3))
            .fail_contains("missing.exe", "not found");

        let build = ProcessBuilder::new("cmd").args(["/c", "build.bat"]).cwd("proj");
        assert_eq!(runner.run(&build).unwrap(), Some(3));
        assert!(runner
            .run(&ProcessBuilder::new("cmd").args(["/c", "missing.exe"]))
            .is_err());
        assert_eq!(
            runner.run(&ProcessBuilder::new("cmd").args(["/c", "app.exe"])).unwrap(),
            Some(0)
        );

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].cwd, Some(PathBuf::from("proj")));
    }

    #[test]
    fn test_mock_runner_default() {
        let mut runner = MockRunner::new();
        runner.set_default(None);
        assert_eq!(runner.run(&ProcessBuilder::new("anything")).unwrap(), None);
    }

    #[test]
    fn test_fake_hive() {
        let hive = FakeHive::new().with_key("A", RegistryView::Bits32);
        assert_eq!(hive.open("A", RegistryView::Bits32).unwrap(), KeyStatus::Present);
        assert_eq!(hive.open("A", RegistryView::Bits64).unwrap(), KeyStatus::Missing);
        assert_eq!(hive.opened().len(), 2);
    }
}
