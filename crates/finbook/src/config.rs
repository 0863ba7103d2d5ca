use std::{env, num::NonZeroUsize, str::FromStr, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite connection URL (default: "sqlite://finbook.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub database_url: String,
    /// Maximum pooled store connections (default: 10)
    #[allow(dead_code)]
    pub db_max_connections: u32,
    /// How long a query waits for a pooled connection (default: 60)
    #[allow(dead_code)]
    pub db_acquire_timeout_seconds: u64,
    /// Whether reads and writes go through the cache (default: true)
    pub cache_enabled: bool,
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Budget for a single cache call in milliseconds (default: 500)
    pub cache_op_timeout_ms: u64,
    /// Maximum number of cache entries (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Recently invalidated keys tracked by the fence (default: 10,000)
    pub fence_max_keys: usize,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite URL (default: "sqlite://finbook.db")
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
    /// - `DB_ACQUIRE_TIMEOUT_SECONDS` - Pool acquire timeout (default: 60)
    /// - `CACHE_ENABLED` - `false` or `0` bypasses the cache (default: true)
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_OP_TIMEOUT_MS` - Per-call cache budget; slower calls count as failures (default: 500)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `FENCE_MAX_KEYS` - Invalidation fence capacity (default: 10,000)
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://finbook.db".to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10),
            db_acquire_timeout_seconds: parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECONDS", 60),
            cache_enabled: lookup("CACHE_ENABLED")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0"))
                .unwrap_or(true),
            cache_ttl_seconds: parse_or(&lookup, "CACHE_TTL_SECONDS", 300),
            cache_op_timeout_ms: parse_or(&lookup, "CACHE_OP_TIMEOUT_MS", 500),
            cache_max_entries: parse_or(&lookup, "CACHE_MAX_ENTRIES", 10_000),
            fence_max_keys: parse_or(&lookup, "FENCE_MAX_KEYS", 10_000),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Never zero; a zero budget would fail every cache call.
    pub fn cache_op_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_op_timeout_ms.max(1))
    }

    #[allow(dead_code)]
    pub fn db_acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_seconds)
    }

    #[allow(dead_code)]
    pub fn cache_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cache_max_entries).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn fence_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.fence_max_keys).unwrap_or(NonZeroUsize::MIN)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
