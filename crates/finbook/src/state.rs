//! Application state.
//!
//! Handlers see the store only through the entity services. When caching is
//! on, the services are wired to cache-aside decorators that share a single
//! invalidation fence.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use finbook_auth::{AuthConfig, AuthState};
use finbook_core::cache::{Cache, Result as CacheResult};
use finbook_core::storage::{AccountRepository, CategoryRepository, StoreHealth, UserRepository};

use crate::services::{AccountService, CategoryService, UserService};
use crate::storage::cached::{
    CacheAside, CachedAccountRepository, CachedCategoryRepository, CachedUserRepository,
    InvalidationFence,
};

/// Everything the primary store must provide.
pub trait Store:
    UserRepository + AccountRepository + CategoryRepository + StoreHealth + 'static
{
}

impl<T> Store for T where
    T: UserRepository + AccountRepository + CategoryRepository + StoreHealth + 'static
{
}

/// Cache settings used when wiring the decorators.
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub ttl: Duration,
    /// Budget for each cache call.
    pub op_timeout: Duration,
    pub fence_max_keys: NonZeroUsize,
}

/// Shared application state.
///
/// This is cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub accounts: AccountService,
    pub categories: CategoryService,
    /// Liveness probe for the primary store.
    pub store: Arc<dyn StoreHealth>,
    /// Liveness probe for the cache. `None` when caching is disabled.
    pub cache: Option<Arc<dyn Cache>>,
    pub auth: AuthState,
    pub started_at: Instant,
}

impl AppState {
    /// Wires the services straight to the store.
    pub fn uncached<S: Store>(store: Arc<S>, auth_config: AuthConfig) -> Self {
        let users: Arc<dyn UserRepository> = store.clone();
        let accounts: Arc<dyn AccountRepository> = store.clone();
        let categories: Arc<dyn CategoryRepository> = store.clone();

        Self::assemble(users, accounts, categories, store, None, auth_config)
    }

    /// Wires the services through cache-aside decorators over `cache`.
    pub fn cached<S: Store, C: Cache + 'static>(
        store: Arc<S>,
        cache: Arc<C>,
        settings: CacheSettings,
        auth_config: AuthConfig,
    ) -> Self {
        let fence = Arc::new(InvalidationFence::new(settings.fence_max_keys));
        let aside = CacheAside::new(cache.clone(), fence, settings.ttl)
            .with_op_timeout(settings.op_timeout);
        let cache_probe: Arc<dyn Cache> = cache;

        let users: Arc<dyn UserRepository> =
            Arc::new(CachedUserRepository::new(store.clone(), aside.clone()));
        let accounts: Arc<dyn AccountRepository> =
            Arc::new(CachedAccountRepository::new(store.clone(), aside.clone()));
        let categories: Arc<dyn CategoryRepository> =
            Arc::new(CachedCategoryRepository::new(store.clone(), aside));

        Self::assemble(
            users,
            accounts,
            categories,
            store,
            Some(cache_probe),
            auth_config,
        )
    }

    /// Wires through `cache` if it connected, otherwise straight to the
    /// store. The cache is best-effort, so an unreachable backend at boot
    /// only costs the speedup.
    pub fn cached_or_uncached<S: Store, C: Cache + 'static>(
        store: Arc<S>,
        cache: CacheResult<C>,
        settings: CacheSettings,
        auth_config: AuthConfig,
    ) -> Self {
        match cache {
            Ok(cache) => Self::cached(store, Arc::new(cache), settings, auth_config),
            Err(err) => {
                tracing::warn!(error = %err, "cache unavailable, serving without it");
                Self::uncached(store, auth_config)
            }
        }
    }

    fn assemble(
        users: Arc<dyn UserRepository>,
        accounts: Arc<dyn AccountRepository>,
        categories: Arc<dyn CategoryRepository>,
        store: Arc<dyn StoreHealth>,
        cache: Option<Arc<dyn Cache>>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            users: UserService::new(users.clone()),
            accounts: AccountService::new(accounts, users.clone()),
            categories: CategoryService::new(categories, users.clone()),
            store,
            cache,
            auth: AuthState::new(users, auth_config),
            started_at: Instant::now(),
        }
    }
}

/// Allows `CurrentUser` and the auth routes to pull `AuthState` out of the
/// application state.
impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}
