//! Error types for the medical assistant service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::types::UploadErrorResponse;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
///
/// Every stage returns one of these; the HTTP handlers decide how each
/// variant is rendered to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upload with an extension other than .txt, .md or .pdf
    #[error("Unsupported file format: {0}. Use .txt, .md, or .pdf")]
    UnsupportedFormat(String),

    /// Text could not be extracted from an upload
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Embedding API failure
    #[error("Embedding generation failed: {message}")]
    Embedding {
        message: String,
        /// Rate limit, 5xx or transport failure
        transient: bool,
    },

    /// Chat-completion API failure
    #[error("Completion failed: {message}")]
    Completion {
        message: String,
        /// Rate limit, 5xx or transport failure
        transient: bool,
    },

    /// An external call exceeded its time budget
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    /// Query issued before any document was indexed
    #[error("No document has been indexed yet")]
    NoIndexAvailable,

    /// Malformed request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a permanent embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
            transient: false,
        }
    }

    /// Create a permanent completion error
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion {
            message: message.into(),
            transient: false,
        }
    }

    /// Mark an upstream failure as retryable; other variants pass through
    pub fn into_transient(self) -> Self {
        match self {
            Self::Embedding { message, .. } => Self::Embedding {
                message,
                transient: true,
            },
            Self::Completion { message, .. } => Self::Completion {
                message,
                transient: true,
            },
            other => other,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            secs,
        }
    }

    /// Stable machine-readable error code
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::Extraction { .. } => "extraction_failure",
            Error::Embedding { .. } => "embedding_failure",
            Error::Completion { .. } => "completion_failure",
            Error::Timeout { .. } => "timeout",
            Error::NoIndexAvailable => "no_index_available",
            Error::BadRequest(_) => "bad_request",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
            Error::Http(_) => "http_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            Error::Embedding { transient, .. } | Error::Completion { transient, .. } => *transient,
            _ => false,
        }
    }

    /// HTTP status used where a request can fail visibly (document upload)
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::Extraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::BadRequest(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Embedding { .. } | Error::Completion { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::NoIndexAvailable => StatusCode::CONFLICT,
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", self.kind(), self);
        } else {
            tracing::warn!("Request rejected ({}): {}", self.kind(), self);
        }

        (status, Json(UploadErrorResponse::from_error(&self))).into_response()
    }
}
