//! Shared error type across sshmetrics crates.

use thiserror::Error;

/// Stable error codes, independent of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed configuration.
    BadRequest,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Connection refused by the handler chain.
    ConnectionRejected,
    /// Authentication failed.
    AuthFailed,
    /// Authentication backend could not be reached.
    AuthUnavailable,
    /// SSH handshake failed.
    HandshakeFailed,
    /// Metric definition rejected by the collector.
    InvalidMetric,
    /// Metric name registered twice.
    DuplicateMetric,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::ConnectionRejected => "CONNECTION_REJECTED",
            ErrorCode::AuthFailed => "AUTH_FAILED",
            ErrorCode::AuthUnavailable => "AUTH_UNAVAILABLE",
            ErrorCode::HandshakeFailed => "HANDSHAKE_FAILED",
            ErrorCode::InvalidMetric => "INVALID_METRIC",
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SshError>;

/// Unified error type used by contracts, backends and decorators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SshError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("connection rejected: {0}")]
    ConnectionRejected(String),
    #[error("authentication failed: {0}")]
    AuthFailed(String),
    #[error("authentication backend unavailable: {0}")]
    AuthUnavailable(String),
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),
    #[error("invalid metric: {0}")]
    InvalidMetric(String),
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SshError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SshError::BadRequest(_) => ErrorCode::BadRequest,
            SshError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            SshError::ConnectionRejected(_) => ErrorCode::ConnectionRejected,
            SshError::AuthFailed(_) => ErrorCode::AuthFailed,
            SshError::AuthUnavailable(_) => ErrorCode::AuthUnavailable,
            SshError::HandshakeFailed(_) => ErrorCode::HandshakeFailed,
            SshError::InvalidMetric(_) => ErrorCode::InvalidMetric,
            SshError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            SshError::Internal(_) => ErrorCode::Internal,
        }
    }
}
