//! CLI-specific error types and exit code mapping

use bd_scan_build_env::BuildEnvError;
use bd_scan_core::error::BdScanError;

use crate::prompt::PromptError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Invalid flag value or a prompt that could not be answered.
    #[error("configuration error: {0}")]
    Config(String),

    /// The user quit the wizard.
    #[error("aborted: {0}")]
    Aborted(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, terminal read, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from bd-scan-core.
    #[error("{0}")]
    Core(#[from] BdScanError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | Output rendering error                    |
    /// | 2    | Configuration / build environment / quit  |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Aborted(_) | Self::Core(_) => 2,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<BuildEnvError> for CliError {
    fn from(e: BuildEnvError) -> Self {
        Self::Core(e.into())
    }
}

impl From<bd_scan_core::error::ConfigError> for CliError {
    fn from(e: bd_scan_core::error::ConfigError) -> Self {
        Self::Core(e.into())
    }
}

impl From<PromptError> for CliError {
    fn from(e: PromptError) -> Self {
        match e {
            PromptError::Quit => Self::Aborted("quit requested at prompt".to_owned()),
            PromptError::NotFound { .. } => Self::Config(e.to_string()),
            PromptError::Io(io) => Self::Io(io),
        }
    }
}
