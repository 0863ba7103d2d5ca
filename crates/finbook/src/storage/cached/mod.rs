//! Cached repository decorators.
//!
//! Each decorator wraps a repository with the cache-aside pattern:
//!
//! - **Reads**: check the cache first; on a miss fetch from the repository
//!   and populate the cache, unless a write invalidated the key meanwhile
//! - **Writes**: persist to the repository, then invalidate every affected
//!   key before returning. The write and its invalidation run on their own
//!   task so a dropped request cannot skip the invalidation.
//!
//! # Example
//!
//! ```ignore
//! let cache = Arc::new(MemoryCache::new(capacity));
//! let fence = Arc::new(InvalidationFence::new(max_keys));
//! let aside = CacheAside::new(cache, fence, Duration::from_secs(300));
//!
//! let users = CachedUserRepository::new(Arc::new(repository), aside.clone());
//! ```

mod account;
mod aside;
mod category;
mod fence;
#[cfg(test)]
pub(crate) mod mock;
mod user;

pub use account::CachedAccountRepository;
pub use aside::CacheAside;
pub use category::CachedCategoryRepository;
pub use fence::InvalidationFence;
pub use user::CachedUserRepository;
