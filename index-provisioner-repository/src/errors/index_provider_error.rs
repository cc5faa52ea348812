//! Index provider error types.
//!
//! This module defines the unified error type for all administrative API
//! calls, covering transport failures, HTTP status failures and decoding
//! failures.

use thiserror::Error;

/// Unified errors from administrative API operations.
///
/// Used by the `IndexProvider` trait for list, describe and create. Each
/// variant carries the detail reported by the remote service, if any.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexProviderError {
    /// Failed to reach the remote service (DNS, TLS, timeout, refused).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The credential was rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The credential is valid but the operation is not allowed (e.g., quota or plan limits).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested index does not exist.
    #[error("Index not found: {0}")]
    NotFound(String),

    /// An index with the same name already exists.
    #[error("Index already exists: {0}")]
    AlreadyExists(String),

    /// The service rejected the request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to parse the response from the remote service.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Any other non-success HTTP status.
    #[error("API error (status {status}): {body}")]
    ApiError { status: u16, body: String },
}

impl IndexProviderError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a forbidden error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create an already exists error.
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an error for an unmapped HTTP status.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            body: body.into(),
        }
    }

    /// Map a non-success HTTP status and its error detail to a variant.
    ///
    /// # Arguments
    ///
    /// * `status` - The HTTP status code
    /// * `detail` - The error message reported by the service (or the raw body)
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            400 | 422 => Self::InvalidRequest(detail),
            401 => Self::Unauthorized(detail),
            403 => Self::Forbidden(detail),
            404 => Self::NotFound(detail),
            409 => Self::AlreadyExists(detail),
            _ => Self::ApiError {
                status,
                body: detail,
            },
        }
    }
}

impl From<reqwest::Error> for IndexProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::ConnectionError(err.to_string())
        }
    }
}
