//! Health check endpoint.
//!
//! `/health` pings the store and the cache. Only a store failure makes the
//! service unhealthy; a cache outage degrades it to uncached reads.

use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Probe {
    Up,
    Down,
    Disabled,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub store: Probe,
    pub cache: Probe,
}

fn probe<E: std::fmt::Display>(
    component: &'static str,
    outcome: Result<Result<(), E>, tokio::time::error::Elapsed>,
) -> Probe {
    match outcome {
        Ok(Ok(())) => Probe::Up,
        Ok(Err(e)) => {
            tracing::warn!(component, error = %e, "health ping failed");
            Probe::Down
        }
        Err(_) => {
            tracing::warn!(component, "health ping timed out");
            Probe::Down
        }
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    let store = probe(
        "store",
        tokio::time::timeout(PING_TIMEOUT, state.store.ping()).await,
    );

    let cache = match &state.cache {
        Some(cache) => probe(
            "cache",
            tokio::time::timeout(PING_TIMEOUT, cache.ping()).await,
        ),
        None => Probe::Disabled,
    };

    let (code, status) = if store == Probe::Up {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
    };

    let report = HealthReport {
        status,
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        store,
        cache,
    };

    (code, Json(report)).into_response()
}
