mod app;
mod cache;
mod config;
mod handlers;
mod services;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use finbook_auth::AuthConfig;
use finbook_core::storage::StoreHealth;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::Config,
    state::{AppState, CacheSettings},
    storage::PrimaryStore,
};

/// Finbook - Personal finance bookkeeping API
#[derive(Parser, Debug)]
#[command(name = "finbook")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    let auth_config = AuthConfig::from_env().context("invalid auth configuration")?;
    let config = Config::from_env();

    let store = Arc::new(open_store(&config).await?);
    store
        .ping()
        .await
        .context("primary store is not reachable")?;

    let state = build_state(store, &config, auth_config).await;

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "finbook=debug,finbook_auth=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[cfg(feature = "inmemory")]
async fn open_store(_config: &Config) -> Result<PrimaryStore> {
    tracing::warn!("using in-memory storage; data is lost on restart");
    Ok(PrimaryStore::new())
}

#[cfg(feature = "sqlite")]
async fn open_store(config: &Config) -> Result<PrimaryStore> {
    tracing::info!(url = %config.database_url, "opening sqlite store");
    let store = PrimaryStore::connect(
        &config.database_url,
        config.db_max_connections,
        config.db_acquire_timeout(),
    )
    .await
    .context("failed to open sqlite store")?;
    Ok(store)
}

async fn build_state(
    store: Arc<PrimaryStore>,
    config: &Config,
    auth_config: AuthConfig,
) -> AppState {
    if !config.cache_enabled {
        tracing::info!("cache disabled");
        return AppState::uncached(store, auth_config);
    }

    let settings = CacheSettings {
        ttl: config.cache_ttl(),
        op_timeout: config.cache_op_timeout(),
        fence_max_keys: config.fence_capacity(),
    };

    #[cfg(feature = "memory")]
    let cache = {
        tracing::info!(
            max_entries = config.cache_max_entries,
            ttl_seconds = config.cache_ttl_seconds,
            "using in-memory cache"
        );
        Ok(cache::MemoryCache::new(config.cache_capacity()))
    };

    #[cfg(feature = "redis")]
    let cache = {
        tracing::info!(
            url = %config.redis_url,
            ttl_seconds = config.cache_ttl_seconds,
            "using redis cache"
        );
        cache::RedisCache::new(&config.redis_url, config.cache_op_timeout()).await
    };

    AppState::cached_or_uncached(store, cache, settings, auth_config)
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
