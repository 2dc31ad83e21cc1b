//! Shared error type across viewcounter crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed or missing input.
    BadRequest,
    /// Value rejected before reaching the store.
    InvalidValue,
    /// Unknown route.
    NotFound,
    /// Known route, wrong method.
    MethodNotAllowed,
    /// Storage backend unreachable or misbehaving.
    BackendUnavailable,
    /// Request deadline exceeded.
    Timeout,
    /// Startup configuration error.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidValue => "INVALID_VALUE",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::BackendUnavailable => "BACKEND_UNAVAILABLE",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// Whether the caller is at fault (never retried, logged at debug only).
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ClientCode::BadRequest
                | ClientCode::InvalidValue
                | ClientCode::NotFound
                | ClientCode::MethodNotAllowed
        )
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ViewCounterError>;

/// Unified error type used by core and gateway.
///
/// `Display` is the human-readable message placed in the `error` field of
/// JSON responses, so client-facing variants print their message verbatim.
#[derive(Debug, Error)]
pub enum ViewCounterError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidValue(String),
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("request timed out")]
    Timeout,
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ViewCounterError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ViewCounterError::Validation(_) => ClientCode::BadRequest,
            ViewCounterError::InvalidValue(_) => ClientCode::InvalidValue,
            ViewCounterError::NotFound => ClientCode::NotFound,
            ViewCounterError::MethodNotAllowed => ClientCode::MethodNotAllowed,
            ViewCounterError::BackendUnavailable(_) => ClientCode::BackendUnavailable,
            ViewCounterError::Timeout => ClientCode::Timeout,
            ViewCounterError::Config(_) => ClientCode::Config,
            ViewCounterError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Shorthand for wrapping any store-side failure.
    pub fn backend(e: impl std::fmt::Display) -> Self {
        ViewCounterError::BackendUnavailable(e.to_string())
    }
}
