//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is the central error type for the relay. Each variant
//! maps to a numeric code, an HTTP status, and a structured JSON error
//! response; the WebSocket side reuses the same codes in `error` events.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "message body must not be empty",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`RelayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category       | HTTP Status               |
/// |-----------|----------------|---------------------------|
/// | 1000–1999 | Validation     | 400 Bad Request           |
/// | 2000–2999 | Not Found      | 404 Not Found             |
/// | 3000–3999 | Server/Storage | 500 Internal Server Error |
/// | 4000–4999 | Auth           | 401 Unauthorized          |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Message body was empty.
    #[error("message body must not be empty")]
    EmptyBody,

    /// Room name was empty.
    #[error("room name must not be empty")]
    EmptyRoomName,

    /// Request validation failed (malformed command, bad parameter).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Room with the given ID was not found.
    #[error("room not found: {0}")]
    RoomNotFound(uuid::Uuid),

    /// Persistence layer failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Missing, malformed, or expired bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::EmptyBody => 1001,
            Self::EmptyRoomName => 1002,
            Self::InvalidRequest(_) => 1003,
            Self::RoomNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
            Self::Unauthorized(_) => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyBody | Self::EmptyRoomName | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for RelayError {
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
