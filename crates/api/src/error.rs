//! API error types with HTTP response mapping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use saga::BookingError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
///
/// Every response carries a stable message and a machine-readable code:
/// `{"error": <message>, "code": <code>}`.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Malformed input that never reached the saga: a bad id, body or query.
    BadRequest(String),
    /// Saga, pricing or store error.
    Booking(BookingError),
}

impl ApiError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::Booking(err) => booking_error_parts(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = serde_json::json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

fn booking_error_parts(err: BookingError) -> (StatusCode, &'static str, String) {
    match err {
        BookingError::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        BookingError::EntityNotFound { .. } => {
            (StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        BookingError::InsufficientInventory { .. } => (
            StatusCode::CONFLICT,
            "insufficient_inventory",
            "Room not available".to_string(),
        ),
        BookingError::Dependency {
            dependency,
            ref reason,
            retryable,
        } => {
            tracing::warn!(dependency, %reason, retryable, "dependency failure");
            let status = if retryable {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::BAD_GATEWAY
            };
            (
                status,
                "dependency_error",
                format!("{dependency} unavailable, retry later"),
            )
        }
        BookingError::Storage(e) => {
            tracing::error!(error = %e, "storage error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal storage error".to_string(),
            )
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected request body");
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`"
            }
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::JsonDataError(_) => {
                "Request body has a field of the wrong type or range"
            }
            _ => "Invalid request body",
        };
        ApiError::BadRequest(message.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected path parameter");
        ApiError::BadRequest("Invalid path parameter".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected query string");
        ApiError::BadRequest("Invalid query parameters".to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Booking(err.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Booking(err.into())
    }
}
