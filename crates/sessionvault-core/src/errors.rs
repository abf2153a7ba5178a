//! Error taxonomy for session operations and its HTTP mapping.
//!
//! Core operations return [`AuthError`], which knows nothing about HTTP.
//! Handlers convert it into [`AppError`], the only type that carries a
//! status code and renders the uniform error body:
//!
//! ```json
//! { "success": false, "message": "invalid user credentials", "errors": [] }
//! ```

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

/// Failure of a core session operation.
#[derive(Debug, ThisError)]
pub enum AuthError {
    /// Missing or malformed input.
    #[error("{message}")]
    Validation { message: String, errors: Vec<String> },

    /// Missing credential or wrong password.
    #[error("{0}")]
    Unauthorized(String),

    /// Bad signature, expired token, or the token's user no longer exists.
    #[error("{0}")]
    InvalidToken(String),

    /// A correctly signed refresh token that is no longer the stored one.
    #[error("{0}")]
    ReplayedToken(String),

    /// Username or email already taken.
    #[error("{0}")]
    Conflict(String),

    /// No user matches the login identifier.
    #[error("{0}")]
    NotFound(String),

    /// Anything unexpected. Never shown to clients.
    #[error(transparent)]
    Internal(#[from] Error),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Validation failure carrying one entry per offending field.
    pub fn validation_with(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken(message.into())
    }

    pub fn replayed_token(message: impl Into<String>) -> Self {
        Self::ReplayedToken(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::Internal(err.into())
    }

    /// Stable name of the error kind, used for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::Unauthorized(_) => "Unauthorized",
            Self::InvalidToken(_) => "InvalidToken",
            Self::ReplayedToken(_) => "ReplayedToken",
            Self::Conflict(_) => "Conflict",
            Self::NotFound(_) => "NotFound",
            Self::Internal(_) => "Internal",
        }
    }
}

/// HTTP-facing error: a status code plus the underlying error.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub errors: Vec<String>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            errors: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    /// Message safe to send to clients.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation { message, errors } => {
                AppError::bad_request(anyhow::anyhow!(message)).with_errors(errors)
            }
            AuthError::Unauthorized(msg)
            | AuthError::InvalidToken(msg)
            | AuthError::ReplayedToken(msg) => AppError::unauthorized(anyhow::anyhow!(msg)),
            AuthError::Conflict(msg) => AppError::conflict(anyhow::anyhow!(msg)),
            AuthError::NotFound(msg) => AppError::not_found(anyhow::anyhow!(msg)),
            AuthError::Internal(e) => AppError::internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = ?self.error, status = %self.status.as_u16(), "Request failed");
        }

        let body = Json(json!({
            "success": false,
            "message": self.public_message(),
            "errors": self.errors,
        }));

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (AuthError::validation("valid email required"), StatusCode::BAD_REQUEST),
            (AuthError::unauthorized("unauthorized request"), StatusCode::UNAUTHORIZED),
            (AuthError::invalid_token("invalid access token"), StatusCode::UNAUTHORIZED),
            (
                AuthError::replayed_token("refresh token is expired or used"),
                StatusCode::UNAUTHORIZED,
            ),
            (AuthError::conflict("taken"), StatusCode::CONFLICT),
            (AuthError::not_found("user does not exist"), StatusCode::NOT_FOUND),
            (
                AuthError::internal(anyhow::anyhow!("db down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let app_error: AppError = err.into();
            assert_eq!(app_error.status, expected);
        }
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let app_error: AppError = AuthError::internal(anyhow::anyhow!("connection refused")).into();
        assert_eq!(app_error.public_message(), "Internal Server Error");
    }

    #[test]
    fn test_client_message_is_kept() {
        let app_error: AppError = AuthError::unauthorized("invalid user credentials").into();
        assert_eq!(app_error.public_message(), "invalid user credentials");
    }

    #[test]
    fn test_validation_errors_are_carried() {
        let err = AuthError::validation_with(
            "password is required",
            vec!["password is required".to_string()],
        );
        let app_error: AppError = err.into();
        assert_eq!(app_error.errors, vec!["password is required".to_string()]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(AuthError::replayed_token("x").kind(), "ReplayedToken");
        assert_eq!(AuthError::validation("x").kind(), "ValidationError");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        use axum::body::to_bytes;

        let response = AppError::from(AuthError::conflict("already exists")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "already exists");
        assert!(body["errors"].as_array().unwrap().is_empty());
    }
}
