//! Build configuration and discovery error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error that prevents producing a valid build configuration.
///
/// Anything raised here is fatal for the invocation. Failures of the
/// compiler or the produced executable are not errors; they are reported
/// through [`ExecutionResult`](crate::builder::ExecutionResult).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid mode `{mode}`, supported modes are: release, debug")]
    InvalidMode { mode: String },

    #[error("invalid architecture `{arch}`, supported architectures are: x64, x86")]
    InvalidArchitecture { arch: String },

    #[error("no source files given")]
    NoSources,

    #[error(
        "no Visual Studio installation found\n\
         hint: pass --suite (e.g. --suite 2022) or install Visual Studio"
    )]
    NoSuiteFound,

    #[error(
        "no MSVC or Windows SDK version found for Visual Studio {suite}\n\
         hint: pass --sdk (e.g. --sdk 10.0.22621.0) or check --edition"
    )]
    NoSdkFound { suite: String },

    #[error("invalid working directory: {}", path.display())]
    WorkingDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory: {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write build script: {}", path.display())]
    WriteScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// Whether this error comes from the requested configuration rather than
    /// the filesystem.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            BuildError::WorkingDir { .. }
                | BuildError::CreateDir { .. }
                | BuildError::WriteScript { .. }
        )
    }
}

/// Failure of a single discovery strategy.
///
/// These never reach the caller of discovery: they are logged as warnings and
/// the strategy contributes nothing.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("vswhere.exe not found")]
    ToolNotFound,

    #[error("failed to run `{program}`: {reason}")]
    Spawn { program: String, reason: String },

    #[error("`{program}` exited with code {code:?}: {stderr}")]
    ToolFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("malformed vswhere output")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("the registry is not available on this platform")]
    RegistryUnsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(BuildError::NoSuiteFound.is_configuration());
        assert!(BuildError::InvalidMode {
            mode: "turbo".into()
        }
        .is_configuration());

        let fs_err = BuildError::CreateDir {
            path: PathBuf::from("build/x64"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!fs_err.is_configuration());
    }

    #[test]
    fn test_messages_name_the_input() {
        let err = BuildError::InvalidArchitecture { arch: "arm".into() };
        assert!(err.to_string().contains("`arm`"));

        let err = BuildError::NoSdkFound {
            suite: "2022".into(),
        };
        assert!(err.to_string().contains("2022"));
    }
}
