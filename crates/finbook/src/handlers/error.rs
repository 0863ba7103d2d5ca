use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use finbook_auth::AuthError;
use finbook_core::api::ApiResponse;

use crate::services::ServiceError;

/// Every error a handler can return. Renders as the failure envelope.
#[derive(Debug)]
pub enum AppError {
    Service(ServiceError),
    Auth(AuthError),
    BadRequest { message: String, reason: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            reason: reason.into(),
        }
    }
}

/// Parses a path id, rejecting anything that is not an integer.
///
/// `label` names the resource in the message, as in "Invalid user ID".
pub fn parse_id(raw: &str, label: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::bad_request(format!("Invalid {label} ID"), "ID must be a number")
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, reason) = match self {
            AppError::Auth(err) => return err.into_response(),
            AppError::BadRequest { message, reason } => {
                (StatusCode::BAD_REQUEST, message, Some(reason))
            }
            AppError::Service(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    tracing::error!(error = %err, status = %status, "request failed");
                    (status, "Internal server error".to_string(), None)
                } else {
                    tracing::warn!(error = %err, status = %status, "API error");
                    let message = err.to_string();
                    (status, message.clone(), Some(message))
                }
            }
        };

        (status, Json(ApiResponse::failure(message, reason))).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request("Invalid request body", rejection.body_text())
    }
}
