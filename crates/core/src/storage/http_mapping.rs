//! Status codes for store failures that reach the HTTP boundary unmapped.
//!
//! The services translate the errors they understand (duplicate email,
//! duplicate category name, missing records) into domain errors first; this
//! table covers whatever is left.

use super::RepositoryError;

/// Status code for a [`RepositoryError`].
///
/// Rejections caused by the request are 4xx, an unreachable store is 503 so
/// clients may retry, and anything the store returned but we could not read
/// is 500.
///
/// ```
/// use finbook_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let taken = RepositoryError::Duplicate {
///     entity_type: "User",
///     field: "email",
///     value: "ana@example.com".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&taken), 409);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Duplicate { .. } => 409,
        RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => 500,
        RepositoryError::ConnectionFailed(_) => 503,
    }
}
