//! Error types for the Splunk dispatch client.
//!
//! Every variant belongs to exactly one [`ErrorKind`], the code callers use to
//! decide between retrying, aborting and reporting to an operator.

use std::time::Duration;
use thiserror::Error;

use crate::models::DispatchState;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never produced a usable HTTP response.
    Communication,
    /// The server answered, but not with the status the operation requires.
    UnexpectedStatus,
    /// The referenced identity does not exist server-side.
    NotFound,
    /// A job reached a terminal state before the requested one.
    TerminalState,
    /// The caller supplied arguments that cannot be honored.
    Configuration,
    /// A payload (server response or event record) could not be decoded.
    Format,
    /// The caller cancelled the operation.
    Cancelled,
    /// A bounded wait ran out of time.
    Timeout,
}

impl ErrorKind {
    /// Returns the stable string code for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Communication => "communication",
            ErrorKind::UnexpectedStatus => "unexpected_status",
            ErrorKind::NotFound => "not_found",
            ErrorKind::TerminalState => "terminal_state",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Format => "format",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during Splunk dispatch client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Connection refused.
    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    /// Request timed out at the transport layer, after the elapsed time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Rate-limit retries exhausted.
    #[error("Maximum retries exceeded ({0} attempts)")]
    MaxRetriesExceeded(usize),

    /// API error response from Splunk.
    #[error("API error ({status}) at {url}: {message}{}", .request_id.as_ref().map(|id| format!(" [Request ID: {id}]")).unwrap_or_default())]
    ApiError {
        status: u16,
        url: String,
        message: String,
        request_id: Option<String>,
    },

    /// A successful but unexpected HTTP status (e.g. job creation without `201 Created`).
    #[error("{operation} expected HTTP {expected} but received HTTP {actual}")]
    UnexpectedStatus {
        operation: &'static str,
        expected: u16,
        actual: u16,
    },

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The job reached a terminal state before the requested target.
    #[error("Job {sid} reached terminal state {state} before {target}")]
    TerminalState {
        sid: String,
        state: DispatchState,
        target: DispatchState,
    },

    /// Caller-supplied arguments cannot be honored.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid response format from Splunk.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Malformed event record.
    #[error("Invalid event record: {0}")]
    EventFormat(String),

    /// Event stream write failure.
    #[error("Event stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// A bounded wait did not complete in time.
    #[error("{operation} timed out after {timeout:?}")]
    OperationTimeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpError(e) if e.is_decode() => ErrorKind::Format,
            Self::HttpError(_)
            | Self::ConnectionRefused(_)
            | Self::Timeout(_)
            | Self::MaxRetriesExceeded(_)
            | Self::Io(_) => ErrorKind::Communication,
            Self::ApiError { status: 404, .. } | Self::NotFound(_) => ErrorKind::NotFound,
            Self::ApiError { .. } | Self::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            Self::TerminalState { .. } => ErrorKind::TerminalState,
            Self::Configuration(_) | Self::InvalidUrl(_) => ErrorKind::Configuration,
            Self::InvalidResponse(_) | Self::EventFormat(_) => ErrorKind::Format,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::OperationTimeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Check if this error is retryable by the caller.
    ///
    /// Only communication failures qualify; the client itself never retries them.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Communication
    }

    /// Check if an HTTP status code is retried by the transport layer.
    ///
    /// Only 429 (Too Many Requests) is retried, with exponential backoff.
    pub fn is_retryable_status(status: u16) -> bool {
        status == 429
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        let err = ClientError::Timeout(Duration::from_secs(1));
        assert!(err.is_retryable());

        let err = ClientError::Configuration("bad".to_string());
        assert!(!err.is_retryable());

        let err = ClientError::TerminalState {
            sid: "sid".to_string(),
            state: DispatchState::Failed,
            target: DispatchState::Running,
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ClientError::NotFound("sid".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ClientError::ApiError {
                status: 404,
                url: "test".to_string(),
                message: "missing".to_string(),
                request_id: None,
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ClientError::ApiError {
                status: 400,
                url: "test".to_string(),
                message: "bad".to_string(),
                request_id: None,
            }
            .kind(),
            ErrorKind::UnexpectedStatus
        );
        assert_eq!(
            ClientError::UnexpectedStatus {
                operation: "create job",
                expected: 201,
                actual: 200,
            }
            .kind(),
            ErrorKind::UnexpectedStatus
        );
        assert_eq!(
            ClientError::EventFormat("bad".to_string()).kind(),
            ErrorKind::Format
        );
        assert_eq!(ClientError::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_terminal_state_message_names_sid_and_states() {
        let err = ClientError::TerminalState {
            sid: "1700000000.42".to_string(),
            state: DispatchState::Failed,
            target: DispatchState::Running,
        };
        let message = err.to_string();
        assert!(message.contains("1700000000.42"));
        assert!(message.contains("FAILED"));
        assert!(message.contains("RUNNING"));
    }

    #[test]
    fn test_api_error_includes_request_id() {
        let err = ClientError::ApiError {
            status: 500,
            url: "https://localhost:8089/services/search/jobs".to_string(),
            message: "boom".to_string(),
            request_id: Some("abc123".to_string()),
        };
        assert!(err.to_string().contains("[Request ID: abc123]"));
    }

    #[test]
    fn test_is_retryable_status() {
        assert!(ClientError::is_retryable_status(429));
        assert!(!ClientError::is_retryable_status(404));
        assert!(!ClientError::is_retryable_status(503));
        assert!(!ClientError::is_retryable_status(201));
    }

    #[test]
    fn test_error_kind_codes() {
        assert_eq!(ErrorKind::TerminalState.as_str(), "terminal_state");
        assert_eq!(ErrorKind::Configuration.to_string(), "configuration");
    }
}
