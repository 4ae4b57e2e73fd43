//! HTTP server facade for the catalog with Axum, error pages, and request tracing.

use std::future::Future;

use anyhow::Context;
use axum::{response::Redirect, routing::get, Router};

use catalog_db::models::CATALOG_ROOT;
use catalog_kernel::ModuleRegistry;

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server and serve until `shutdown` resolves
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &catalog_kernel::settings::Settings,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let address = settings.server.bind_address();
    tracing::info!("starting HTTP server on {}", address);

    let app = build_router(registry, settings);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with every module's routes under `/catalog`
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &catalog_kernel::settings::Settings,
) -> Router {
    let mut catalog = Router::new();
    for module in registry.modules() {
        tracing::info!(module = module.name(), "mounting module routes under {}", CATALOG_ROOT);
        catalog = catalog.merge(module.routes());
    }

    RouterBuilder::new()
        .route("/healthz", get(health_check))
        .route("/", get(|| async { Redirect::to(&format!("{CATALOG_ROOT}/genres")) }))
        .mount_catalog(CATALOG_ROOT, catalog)
        .with_not_found_fallback()
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .build()
}

/// Resolves on Ctrl-C; pass to [`start_server`] for graceful shutdown
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
