//! SQLite error mapping.
//!
//! Maps `sqlx::Error` to `RepositoryError` from `finbook_core::storage`.
//! Constraint violations map to semantic variants so services can tell a
//! duplicate apart from an outage.

use finbook_core::storage::RepositoryError;

/// The unique field a write may collide on, used to build `Duplicate`.
#[derive(Debug, Clone, Copy)]
pub struct UniqueField<'a> {
    pub field: &'static str,
    pub value: &'a str,
}

/// Maps a sqlx error to a RepositoryError.
///
/// # Error Mapping
///
/// - UNIQUE violation → `RepositoryError::Duplicate` (when `unique` is known)
/// - FOREIGN KEY / CHECK violation → `RepositoryError::InvalidData`
/// - Pool and I/O errors → `RepositoryError::ConnectionFailed`
/// - Decode errors → `RepositoryError::Serialization`
/// - All other errors → `RepositoryError::QueryFailed`
pub fn map_sqlx_error(
    err: sqlx::Error,
    entity_type: &'static str,
    unique: Option<UniqueField<'_>>,
) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => match unique {
            Some(UniqueField { field, value }) => RepositoryError::Duplicate {
                entity_type,
                field,
                value: value.to_string(),
            },
            None => RepositoryError::QueryFailed(err.to_string()),
        },
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            RepositoryError::InvalidData(format!(
                "Foreign key constraint violation for {entity_type}"
            ))
        }
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            RepositoryError::InvalidData(format!("Check constraint violation for {entity_type}"))
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => RepositoryError::ConnectionFailed(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            RepositoryError::Serialization(err.to_string())
        }
        sqlx::Error::RowNotFound => RepositoryError::NotFound {
            entity_type,
            id: "unknown".to_string(),
        },
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}
