/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts automatically.
///
/// # Taxonomy (and HTTP mapping)
///
/// - `AuthenticationRequired` → `303 See Other` to `/login/` with an error
///   message body; the gated operation never executes.
/// - `PermissionDenied` → `303` to the resource's own list page with an
///   error message body.
/// - `Validation` → `422 Unprocessable Entity` with field-keyed messages;
///   no state change.
/// - `ReferentialConflict` → `303` to the resource's own list page with a
///   "cannot delete, in use" message; no row removed.
/// - `InvalidCredentials` → `401` (login form submission only).
/// - `NotFound` → `404`.
/// - `Internal` → `500`, details logged but not exposed.
///
/// All failures are recoverable at the request boundary; none are fatal to
/// the process.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::{guard::Denial, models, validate::FieldError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Caller is not logged in; redirect to the login page
    AuthenticationRequired,

    /// Caller is logged in but may not perform this operation;
    /// redirect to the given list page
    PermissionDenied {
        /// Redirect target (the resource's list page)
        list: &'static str,

        /// Human-readable reason
        message: String,
    },

    /// One or more fields failed validation (422)
    Validation(Vec<FieldError>),

    /// Delete blocked because dependent rows still reference the target;
    /// redirect to the given list page
    ReferentialConflict {
        /// Redirect target (the resource's list page)
        list: &'static str,

        /// Human-readable reason
        message: String,
    },

    /// Login failed (401)
    InvalidCredentials,

    /// Resource not found (404)
    NotFound(String),

    /// Internal server error (500)
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "authentication_required", "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Field-keyed validation errors, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::AuthenticationRequired => write!(f, "Authentication required"),
            ApiError::PermissionDenied { message, .. } => {
                write!(f, "Permission denied: {}", message)
            }
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::ReferentialConflict { message, .. } => {
                write!(f, "Referential conflict: {}", message)
            }
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Builds a `303 See Other` response carrying a message body
fn see_other(location: &str, error_code: &str, message: String) -> Response {
    let body = Json(ErrorResponse {
        error: error_code.to_string(),
        message,
        errors: None,
    });

    let mut response = (StatusCode::SEE_OTHER, body).into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::AuthenticationRequired => see_other(
                "/login/",
                "authentication_required",
                Denial::NotAuthenticated.to_string(),
            ),
            ApiError::PermissionDenied { list, message } => {
                see_other(list, "permission_denied", message)
            }
            ApiError::ReferentialConflict { list, message } => {
                see_other(list, "referential_conflict", message)
            }
            ApiError::Validation(errors) => {
                let body = Json(ErrorResponse {
                    error: "validation_error".to_string(),
                    message: "Request validation failed".to_string(),
                    errors: Some(errors),
                });
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            ApiError::InvalidCredentials => {
                let body = Json(ErrorResponse {
                    error: "invalid_credentials".to_string(),
                    message: "Invalid username or password".to_string(),
                    errors: None,
                });
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
            ApiError::NotFound(msg) => {
                let body = Json(ErrorResponse {
                    error: "not_found".to_string(),
                    message: msg,
                    errors: None,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                let body = Json(ErrorResponse {
                    error: "internal_error".to_string(),
                    message: "An internal error occurred".to_string(),
                    errors: None,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations are mapped back to a field-keyed
/// validation error (duplicate username or name). Foreign-key violations
/// on deletes are intercepted by the delete handlers before this
/// conversion runs; one that slips through is an internal error.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(constraint) = models::unique_violation(&err) {
            let field = if constraint.contains("username") {
                "username"
            } else {
                "name"
            };
            return ApiError::Validation(vec![FieldError::new(
                field,
                format!("A record with this {} already exists.", field),
            )]);
        }

        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert guard denials to API errors
///
/// Each denial carries its redirect target: authentication failures go to
/// the login page, ownership failures to the user list, authorship
/// failures to the task list.
impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NotAuthenticated => ApiError::AuthenticationRequired,
            Denial::NotOwner => ApiError::PermissionDenied {
                list: "/users/",
                message: denial.to_string(),
            },
            Denial::NotAuthor => ApiError::PermissionDenied {
                list: "/tasks/",
                message: denial.to_string(),
            },
        }
    }
}

/// Convert password errors to API errors
impl From<taskboard_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskboard_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
///
/// An invalid or expired token means the caller is effectively not logged
/// in, so these map to the login redirect.
impl From<taskboard_shared::auth::jwt::JwtError> for ApiError {
    fn from(_err: taskboard_shared::auth::jwt::JwtError) -> Self {
        ApiError::AuthenticationRequired
    }
}
