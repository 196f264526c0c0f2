//! HomeWiz data platform — application entry point.
//!
//! Composes the service context explicitly at startup: configuration,
//! storage backend, cache, retry executor, and error log all live here,
//! not in module-level globals.

use homewiz_core::query::ListOptions;
use homewiz_db::{DbConfig, MemoryStore, RestStore, ServiceContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("homewiz=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting HomeWiz data platform...");

    let config = DbConfig::from_env();
    if config.is_configured() {
        let ctx = ServiceContext::new(RestStore::new(&config));
        probe(&ctx).await;
    } else {
        tracing::warn!(
            "backend not configured (HOMEWIZ_BACKEND_URL / HOMEWIZ_BACKEND_KEY); \
             falling back to the in-memory store"
        );
        let ctx = ServiceContext::new(MemoryStore::new());
        probe(&ctx).await;
    }

    tracing::info!("HomeWiz data platform stopped.");
}

/// Health probe: one bounded read through the full cache/retry stack.
async fn probe<S: homewiz_core::store::StoreClient + 'static>(ctx: &ServiceContext<S>) {
    let response = ctx.buildings().list(ListOptions::new().limit(1)).await;
    if response.success {
        tracing::info!(
            buildings = response.count.unwrap_or(0),
            "storage backend reachable"
        );
    } else {
        let detail = response
            .error
            .map(|err| err.message)
            .unwrap_or_else(|| "unknown error".to_string());
        tracing::error!(error = %detail, "storage backend probe failed");
    }
}
