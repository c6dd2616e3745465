// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::grading::ValidationError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// Callers only need to tell validation failures apart from everything else;
/// the `kind` field in the response body carries that distinction.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 500, with a caller-facing "Unable to ..." message
    Persistence(String),

    // 400 Bad Request (malformed payload)
    BadRequest(String),

    // 400 Bad Request (grading / option rules)
    Validation(ValidationError),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate email)
    Conflict(String),
}

impl AppError {
    /// Logs a storage failure and hides it behind a generic message.
    pub fn persistence(action: &str, err: sqlx::Error) -> Self {
        tracing::error!("Unable to {}: {:?}", action, err);
        AppError::Persistence(format!("Unable to {}", action))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InternalServerError(_) => "internal",
            AppError::Persistence(_) => "persistence",
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(err) => err.kind(),
            AppError::AuthError(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg)
            | AppError::Persistence(msg)
            | AppError::BadRequest(msg)
            | AppError::AuthError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => write!(f, "{}", msg),
            AppError::Validation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Persistence(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = AppError::from(ValidationError::NoAnswers).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn persistence_errors_hide_the_cause() {
        let err = AppError::persistence("get quiz", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), "persistence");
        assert!(matches!(err, AppError::Persistence(ref msg) if msg == "Unable to get quiz"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn display_shows_the_message() {
        let err = AppError::NotFound("Unable to get quiz".to_string());
        assert_eq!(err.to_string(), "Unable to get quiz");
        assert_eq!(
            AppError::from(ValidationError::NoAnswers).to_string(),
            "No answers submitted"
        );
    }

    #[test]
    fn kind_distinguishes_missing_questions_from_missing_answers() {
        assert_eq!(AppError::from(ValidationError::NoQuestions).kind(), "no_questions");
        assert_eq!(AppError::from(ValidationError::NoAnswers).kind(), "no_answers");
    }
}
