//! SQLite storage backend implementation.
//!
//! Implements the repository traits over a bounded `sqlx::SqlitePool`.
//! Connection acquisition waits up to the configured timeout and then fails
//! with `RepositoryError::ConnectionFailed`.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
