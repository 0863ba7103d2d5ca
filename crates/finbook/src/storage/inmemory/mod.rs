//! In-memory storage backend.
//!
//! Stores every table in `BTreeMap`s behind a single `Arc<RwLock<_>>`, so
//! multi-table operations such as the cascading user delete are atomic.
//! Useful for development and for tests where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use finbook::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
