//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `finbook_core::storage`, plus the cache-aside decorators that
//! wrap them. The primary store is selected at compile time via feature
//! flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): in-process tables, lost on restart
//! - `sqlite`: SQLite storage backend using `sqlx`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p finbook --no-default-features --features sqlite,memory
//! ```

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'sqlite' or 'inmemory' feature. \
    Example: cargo build -p finbook --features sqlite"
);

pub mod cached;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

/// The primary store selected by the enabled storage feature.
#[cfg(feature = "inmemory")]
pub type PrimaryStore = InMemoryRepository;

/// The primary store selected by the enabled storage feature.
#[cfg(feature = "sqlite")]
pub type PrimaryStore = SqliteRepository;

/// An empty store of the enabled backend, for tests.
#[cfg(test)]
pub(crate) async fn test_store() -> PrimaryStore {
    #[cfg(feature = "inmemory")]
    {
        InMemoryRepository::new()
    }

    #[cfg(feature = "sqlite")]
    {
        SqliteRepository::new_in_memory()
            .await
            .expect("in-memory sqlite should open")
    }
}
