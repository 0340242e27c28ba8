//! Service error types with HTTP status code mapping.
//!
//! [`EventError`] is the central error type. Each variant maps to a
//! specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EventId, FieldError, ValidationError};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "validation failed: regFees: Registration fees cannot be negative",
///     "details": [
///       { "field": "regFees", "kind": "negative", "message": "Registration fees cannot be negative" }
///     ]
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
    /// Per-field failures, present for validation errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                 |
/// |-----------|---------------------|-----------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request             |
/// | 2000–2999 | Not Found/Conflict  | 404 Not Found / 409 Conflict|
/// | 3000–3999 | Server              | 500 Internal Server Error   |
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// One or more fields failed schema validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Request body could not be parsed.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Query string parameters were invalid.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// No event with the given id exists.
    #[error("event not found: {0}")]
    NotFound(EventId),

    /// An event with the same `eventId` already exists.
    #[error("duplicate key: event {event_id} already exists")]
    DuplicateKey {
        /// The colliding id.
        event_id: EventId,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl EventError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::MalformedBody(_) => 1002,
            Self::InvalidQuery(_) => 1003,
            Self::NotFound(_) => 2001,
            Self::DuplicateKey { .. } => 2002,
            Self::Persistence(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateKey { .. } => StatusCode::CONFLICT,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for EventError {
    fn from(e: sqlx::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let code = self.error_code();
        let message = self.to_string();
        let details = match self {
            Self::Validation(v) => Some(v.errors),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
