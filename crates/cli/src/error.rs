//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ClientError` variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use splunk_dispatch_client::{ClientError, ErrorKind};
use splunk_dispatch_config::ConfigError;

/// Structured exit codes for splunk-dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed successfully.
    Success = 0,

    /// Unhandled or generic failure.
    GeneralError = 1,

    /// HTTP 401: the token is missing, invalid or expired.
    AuthenticationFailed = 2,

    /// Network failure, transport timeout, or a bounded wait that ran out.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// The job (or other resource) does not exist.
    NotFound = 4,

    /// Invalid arguments or configuration; do not retry unchanged.
    ValidationError = 5,

    /// HTTP 403: insufficient capabilities.
    PermissionDenied = 6,

    /// HTTP 429 after retries were exhausted.
    RateLimited = 7,

    /// HTTP 502/503/504.
    ServiceUnavailable = 8,

    /// The job ended before reaching the requested dispatch state.
    JobFailed = 9,

    /// SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Returns true if this exit code indicates a retryable condition.
    #[cfg_attr(not(test), allow(dead_code))]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            ExitCode::ConnectionError | ExitCode::RateLimited | ExitCode::ServiceUnavailable
        )
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::ApiError { status: 401, .. } => ExitCode::AuthenticationFailed,
            ClientError::ApiError { status: 403, .. } => ExitCode::PermissionDenied,
            ClientError::ApiError { status: 400, .. } => ExitCode::ValidationError,
            ClientError::ApiError { status: 429, .. } | ClientError::MaxRetriesExceeded(_) => {
                ExitCode::RateLimited
            }
            ClientError::ApiError {
                status: 502..=504, ..
            } => ExitCode::ServiceUnavailable,
            _ => match err.kind() {
                ErrorKind::Communication | ErrorKind::Timeout => ExitCode::ConnectionError,
                ErrorKind::NotFound => ExitCode::NotFound,
                ErrorKind::Configuration => ExitCode::ValidationError,
                ErrorKind::TerminalState => ExitCode::JobFailed,
                ErrorKind::Cancelled => ExitCode::Interrupted,
                ErrorKind::UnexpectedStatus | ErrorKind::Format => ExitCode::GeneralError,
            },
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns `ExitCode::GeneralError` if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return ExitCode::ValidationError;
            }
        }
        ExitCode::GeneralError
    }
}
