//! Shared error type across canary crates.

use thiserror::Error;

/// Stable error codes, used in logs and asserted on by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid or unreadable configuration.
    BadConfig,
    /// Hostname does not carry a `<cluster>-v<N>-<suffix>` shape.
    HostnameMismatch,
    /// Static content file could not be read.
    ContentUnavailable,
    /// Ambient credentials could not be obtained.
    AuthFailed,
    /// Time series write was rejected or never reached the backend.
    UploadFailed,
    /// Instance metadata lookup failed.
    MetadataUnavailable,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::HostnameMismatch => "HOSTNAME_MISMATCH",
            ErrorCode::ContentUnavailable => "CONTENT_UNAVAILABLE",
            ErrorCode::AuthFailed => "AUTH_FAILED",
            ErrorCode::UploadFailed => "UPLOAD_FAILED",
            ErrorCode::MetadataUnavailable => "METADATA_UNAVAILABLE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CanaryError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum CanaryError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("hostname {0:?} does not match <cluster>-v<N>-<suffix>")]
    HostnameMismatch(String),
    #[error("content unavailable: {0}")]
    ContentUnavailable(String),
    #[error("auth failed: {0}")]
    AuthFailed(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CanaryError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CanaryError::BadConfig(_) => ErrorCode::BadConfig,
            CanaryError::HostnameMismatch(_) => ErrorCode::HostnameMismatch,
            CanaryError::ContentUnavailable(_) => ErrorCode::ContentUnavailable,
            CanaryError::AuthFailed(_) => ErrorCode::AuthFailed,
            CanaryError::UploadFailed(_) => ErrorCode::UploadFailed,
            CanaryError::MetadataUnavailable(_) => ErrorCode::MetadataUnavailable,
            CanaryError::Internal(_) => ErrorCode::Internal,
        }
    }
}
