use axum::http::StatusCode;
use thiserror::Error;

use finbook_core::finance::ValidationError;
use finbook_core::storage::{repository_error_to_status_code, RepositoryError};

/// Errors returned by the entity services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Email {0} is already registered")]
    DuplicateEmail(String),

    #[error("Category {0} already exists")]
    DuplicateCategory(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(RepositoryError),

    #[error("password error: {0}")]
    Password(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DuplicateEmail(_)
            | ServiceError::DuplicateCategory(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Store(err) => StatusCode::from_u16(repository_error_to_status_code(err))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ServiceError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate {
                field: "email",
                value,
                ..
            } => ServiceError::DuplicateEmail(value),
            RepositoryError::Duplicate {
                entity_type: "Category",
                value,
                ..
            } => ServiceError::DuplicateCategory(value),
            other => ServiceError::Store(other),
        }
    }
}

impl From<finbook_auth::AuthError> for ServiceError {
    fn from(err: finbook_auth::AuthError) -> Self {
        match err {
            finbook_auth::AuthError::Password(message) => ServiceError::Password(message),
            other => ServiceError::Password(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_email_is_translated() {
        let err = ServiceError::from(RepositoryError::Duplicate {
            entity_type: "User",
            field: "email",
            value: "ana@example.com".to_string(),
        });

        assert!(matches!(&err, ServiceError::DuplicateEmail(e) if e == "ana@example.com"));
        assert_eq!(err.to_string(), "Email ana@example.com is already registered");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_category_is_translated() {
        let err = ServiceError::from(RepositoryError::Duplicate {
            entity_type: "Category",
            field: "name",
            value: "Food".to_string(),
        });

        assert!(matches!(err, ServiceError::DuplicateCategory(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_keep_repository_status() {
        let err = ServiceError::from(RepositoryError::ConnectionFailed("timeout".to_string()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ServiceError::from(RepositoryError::InvalidData("fk".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_display() {
        let err = ServiceError::not_found("User", 42);
        assert_eq!(err.to_string(), "User not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
