//! Shared cache-aside mechanics for the cached repository decorators.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use finbook_core::cache::{deserialize, serialize, Cache, CacheError, Result as CacheResult};
use finbook_core::storage::{RepositoryError, Result};

use super::fence::{FenceTicket, InvalidationFence};

/// Default budget for a single cache call.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_millis(500);

/// Cache-aside reads and fenced invalidation over a [`Cache`].
///
/// Cache failures never reach callers: a failed, slow or corrupt read is a
/// miss, and failed populates and deletes are logged at `warn`. Every cache
/// call is bounded by `op_timeout`; an elapsed call counts as
/// `CacheError::ConnectionFailed`.
pub struct CacheAside<C: Cache> {
    cache: Arc<C>,
    fence: Arc<InvalidationFence>,
    ttl: Duration,
    op_timeout: Duration,
}

impl<C: Cache> Clone for CacheAside<C> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            fence: self.fence.clone(),
            ttl: self.ttl,
            op_timeout: self.op_timeout,
        }
    }
}

impl<C: Cache> CacheAside<C> {
    /// The fence must be shared by every decorator over the same cache, since
    /// some writes invalidate keys owned by other repositories.
    pub fn new(cache: Arc<C>, fence: Arc<InvalidationFence>, ttl: Duration) -> Self {
        Self {
            cache,
            fence,
            ttl,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Overrides the per-call budget.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Reads a single record through the cache.
    ///
    /// Absent records are not cached.
    pub async fn get_or_load<T, Fut>(&self, key: &str, load: Fut) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<Option<T>>>,
    {
        if let Some(value) = self.cached(key).await {
            return Ok(Some(value));
        }

        let ticket = self.fence.ticket();
        let value = load.await?;
        if let Some(ref v) = value {
            self.populate(key, v, ticket).await;
        }
        Ok(value)
    }

    /// Reads a collection through the cache. The whole list is one entry.
    pub async fn get_or_load_list<T, Fut>(&self, key: &str, load: Fut) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        if let Some(values) = self.cached(key).await {
            return Ok(values);
        }

        let ticket = self.fence.ticket();
        let values = load.await?;
        self.populate(key, &values, ticket).await;
        Ok(values)
    }

    /// Advances the fence for `keys` and deletes them from the cache.
    pub async fn invalidate(&self, keys: &[String]) {
        self.fence.advance(keys);

        for key in keys {
            if let Err(err) = self.bounded(self.cache.delete(key)).await {
                tracing::warn!(key = %key, error = %err, "Failed to invalidate cache key");
            }
        }
        tracing::trace!(keys = ?keys, "Cache keys invalidated");
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.bounded(self.cache.get(key)).await {
            Ok(Some(bytes)) => match deserialize(&bytes) {
                Ok(value) => {
                    tracing::trace!(key = %key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    // Deserialization failed - treat as cache miss
                    tracing::warn!(key = %key, error = %err, "Cache payload deserialization failed");
                    None
                }
            },
            Ok(None) => {
                tracing::trace!(key = %key, "Cache miss");
                None
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache read failed");
                None
            }
        }
    }

    async fn bounded<T>(&self, call: impl Future<Output = CacheResult<T>>) -> CacheResult<T> {
        match tokio::time::timeout(self.op_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::ConnectionFailed(format!(
                "cache call timed out after {:?}",
                self.op_timeout
            ))),
        }
    }

    async fn populate<T: Serialize + ?Sized>(&self, key: &str, value: &T, ticket: FenceTicket) {
        if !self.fence.allows(key, ticket) {
            tracing::debug!(key = %key, "Skipping populate of a key invalidated during the read");
            return;
        }

        let bytes = match serialize(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to serialize cache payload");
                return;
            }
        };

        if let Err(err) = self.bounded(self.cache.set(key, &bytes, Some(self.ttl))).await {
            tracing::warn!(key = %key, error = %err, "Failed to populate cache");
            return;
        }

        // An invalidation may have landed between the check and the set.
        if !self.fence.allows(key, ticket) {
            tracing::debug!(key = %key, "Populate raced an invalidation, removing entry");
            if let Err(err) = self.bounded(self.cache.delete(key)).await {
                tracing::warn!(key = %key, error = %err, "Failed to remove raced cache entry");
            }
        }
    }
}

/// Runs a write and its invalidation on a spawned task and waits for it.
///
/// Dropping the caller's future (client disconnect, timeout) does not cancel
/// the spawned task, so a committed write is always followed by its
/// invalidation.
pub async fn run_to_completion<T, Fut>(write: Fut) -> Result<T>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    tokio::spawn(write).await.map_err(|err| {
        tracing::error!(error = %err, "Write task did not complete");
        RepositoryError::QueryFailed(format!("write task failed: {err}"))
    })?
}

/// Returns true if the cache must be invalidated after a write outcome.
///
/// `changed` decides for successful outcomes. Errors invalidate only when the
/// store may have applied the write anyway.
pub fn should_invalidate<T>(result: &Result<T>, changed: impl FnOnce(&T) -> bool) -> bool {
    match result {
        Ok(value) => changed(value),
        Err(err) => err.may_have_written(),
    }
}
