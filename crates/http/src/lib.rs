//! HTTP server facade for the bookshelf service with Axum and error handling.

use anyhow::Context;
use axum::{routing::get, Router};

use bookshelf_kernel::settings::Settings;

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the application's routes mounted
pub async fn start_server(routes: Router, settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(routes, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with global middleware and health check
pub fn build_router(routes: Router, settings: &Settings) -> Router {
    RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .route("/healthz", get(health_check))
        .merge(routes)
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
