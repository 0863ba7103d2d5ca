use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use finbook_core::api::ApiResponse;
use finbook_core::storage::{repository_error_to_status_code, RepositoryError};

/// Auth errors for the finbook_auth crate.
///
/// This wraps the core `AuthError` and adds crate-specific error variants
/// for I/O operations that can't be in the functional core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (token parsing, credentials, etc.)
    #[error(transparent)]
    Core(#[from] finbook_core::auth::AuthError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// User lookup failed
    #[error(transparent)]
    Store(#[from] RepositoryError),

    /// Hashing or signing failed
    #[error("password error: {0}")]
    Password(String),

    /// Request body could not be parsed
    #[error("Invalid request body")]
    InvalidBody(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Core(_) => StatusCode::UNAUTHORIZED,
            AuthError::Store(err) => StatusCode::from_u16(repository_error_to_status_code(err))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AuthError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AuthError::Config(_) | AuthError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use finbook_core::auth::AuthError as CoreError;

        let status = self.status_code();
        let message = match &self {
            AuthError::Core(CoreError::InvalidCredentials) => self.to_string(),
            AuthError::Core(CoreError::TokenExpired) => "Token expired".to_string(),
            AuthError::Core(_) => "Unauthorized".to_string(),
            _ if status.is_server_error() => {
                tracing::error!(error = %self, "Auth error");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        let reason = match &self {
            AuthError::Core(err) => Some(err.to_string()),
            AuthError::InvalidBody(detail) => Some(detail.clone()),
            _ => None,
        };

        (status, Json(ApiResponse::failure(message, reason))).into_response()
    }
}
