//! Error types with HTTP status code mapping.
//!
//! [`ActivityError`] is the central error type of the history engine. Most
//! variants never reach a user: the paginator collapses them into
//! pagination events. Those that surface through the gateway map to a
//! specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "event not found: 9a1f...",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// History engine error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request            |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Local           | 500 Internal Server Error  |
/// | 5000–5999 | Indexer         | 502 Bad Gateway            |
#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Event with the given id was not found in the account history.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// A history command arrived before any account was activated.
    #[error("no active account")]
    NoActiveAccount,

    /// Nothing is cached for the requested account and scope.
    #[error("no cached history for {0}")]
    CacheMiss(String),

    /// A local store could not be read or written.
    #[error("local store error: {0}")]
    Store(String),

    /// The indexer could not be reached.
    #[error("indexer request failed: {0}")]
    IndexerTransport(String),

    /// The indexer answered with a non-success status.
    #[error("indexer returned status {status}: {message}")]
    IndexerStatus {
        /// HTTP status code returned by the indexer.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The indexer response could not be decoded.
    #[error("invalid indexer response: {0}")]
    IndexerDecode(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ActivityError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EventNotFound(_) => 2001,
            Self::NoActiveAccount => 2002,
            Self::CacheMiss(_) => 2003,
            Self::Internal(_) => 3000,
            Self::Store(_) => 3001,
            Self::IndexerTransport(_) => 5001,
            Self::IndexerStatus { .. } => 5002,
            Self::IndexerDecode(_) => 5003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_) | Self::CacheMiss(_) => StatusCode::NOT_FOUND,
            Self::NoActiveAccount => StatusCode::CONFLICT,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IndexerStatus { status: 404, .. } => StatusCode::NOT_FOUND,
            Self::IndexerTransport(_) | Self::IndexerStatus { .. } | Self::IndexerDecode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<reqwest::Error> for ActivityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::IndexerDecode(err.to_string())
        } else {
            Self::IndexerTransport(err.to_string())
        }
    }
}

impl IntoResponse for ActivityError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
