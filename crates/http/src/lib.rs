//! HTTP server facade for bookshelf with Axum, error handling, and OpenAPI support.

use std::future::Future;

use anyhow::Context;
use axum::{routing::get, Router};

use bookshelf_kernel::{settings::ServerSettings, ModuleRegistry};

pub mod error;
pub mod extract;
pub mod router;

use router::RouterBuilder;

/// Bind the listener and serve until `shutdown` resolves; in-flight requests
/// are allowed to finish.
pub async fn start_server<F>(
    registry: &ModuleRegistry,
    settings: &ServerSettings,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(registry);

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port))
        .await
        .with_context(|| format!("failed to bind to {}:{}", settings.host, settings.port))?;

    tracing::info!(
        "server running on http://{}:{}",
        settings.host,
        settings.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with every module's routes merged in
pub fn build_router(registry: &ModuleRegistry) -> Router {
    let mut router_builder = RouterBuilder::new().route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(module = module.name(), "mounting module routes");
        router_builder = router_builder.mount_module(module.routes());
    }

    router_builder
        .with_openapi(registry)
        .with_tracing()
        .with_request_id()
        .with_cors()
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
