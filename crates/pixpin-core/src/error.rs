//! Execution errors with actionable suggestions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Error codes for failed script dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    LaunchFailed,
    NonZeroExit,
    DecodeFailed,
    Timeout,
    InvalidInput,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::LaunchFailed => write!(f, "LAUNCH_FAILED"),
            ErrorCode::NonZeroExit => write!(f, "NON_ZERO_EXIT"),
            ErrorCode::DecodeFailed => write!(f, "DECODE_FAILED"),
            ErrorCode::Timeout => write!(f, "TIMEOUT"),
            ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
        }
    }
}

/// A failed script execution.
///
/// Launch failures, non-zero exits, timeouts and exhausted decode chains all
/// surface as this one type; `code` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub code: ErrorCode,
    pub message: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (hint: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExecutionError {}

pub type Result<T> = std::result::Result<T, ExecutionError>;

impl ExecutionError {
    /// The OS refused to start the process.
    pub fn launch_failed(program: &str, error: &str) -> Self {
        Self {
            code: ErrorCode::LaunchFailed,
            message: format!("Failed to start '{}': {}", program, error),
            suggestion: Some(format!(
                "Verify that '{}' exists and is executable, or set PIXPIN_EXECUTABLE to the PixPin install path",
                program
            )),
        }
    }

    /// The process ran but reported failure; stderr is carried in the message.
    pub fn non_zero_exit(exit_code: i32, stderr: &str) -> Self {
        let message = match stderr.trim() {
            "" => format!("PixPin script execution failed with exit code {}", exit_code),
            err => format!(
                "PixPin script execution failed with exit code {}\nstderr: {}",
                exit_code, err
            ),
        };
        Self {
            code: ErrorCode::NonZeroExit,
            message,
            suggestion: Some("Check the script syntax and that PixPin is running".into()),
        }
    }

    /// Stdout could not be read as the requested type by any strategy.
    pub fn decode_failed(type_name: &str, stdout: &str) -> Self {
        Self {
            code: ErrorCode::DecodeFailed,
            message: format!(
                "Could not decode script output {:?} as {}",
                stdout.trim(),
                type_name
            ),
            suggestion: Some(
                "Make sure the script returns a value of the expected type".into(),
            ),
        }
    }

    pub fn timeout(elapsed: Duration) -> Self {
        Self {
            code: ErrorCode::Timeout,
            message: format!("PixPin did not finish within {:?}", elapsed),
            suggestion: Some(
                "Increase the execution timeout with --timeout or PIXPIN_TIMEOUT_MS".into(),
            ),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            message: message.into(),
            suggestion: Some("Check the command syntax and try again".into()),
        }
    }
}
