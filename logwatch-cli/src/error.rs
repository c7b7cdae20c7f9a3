//! CLI-specific error types and exit code mapping

use logwatch_core::error::LogwatchError;
use logwatch_dispatch::DispatchError;
use logwatch_scanner::ScanError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// A log file could not be searched under the `fail` read-error policy.
    #[error("scan error: {0}")]
    Scan(String),

    /// The primary mail channel failed.
    #[error("mail error: {0}")]
    Mail(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logwatch-core.
    #[error("{0}")]
    Core(#[from] LogwatchError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success (alert sent or suppressed)        |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration error (timezone, format...) |
    /// | 3    | Scan failure (`on_read_error = "fail"`)   |
    /// | 4    | Primary mail channel failure              |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Scan(_) => 3,
            Self::Mail(_) => 4,
            Self::Io(_) => 10,
            Self::Core(inner) => match inner {
                LogwatchError::Config(_) => 2,
                LogwatchError::Scan(_) => 3,
                LogwatchError::Dispatch(_) => 4,
                LogwatchError::Io(_) => 10,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<ScanError> for CliError {
    fn from(e: ScanError) -> Self {
        if e.is_config() {
            Self::Config(e.to_string())
        } else {
            Self::Scan(e.to_string())
        }
    }
}

impl From<DispatchError> for CliError {
    fn from(e: DispatchError) -> Self {
        Self::Mail(e.to_string())
    }
}
