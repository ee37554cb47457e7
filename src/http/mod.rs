//! HTTP surface
//!
//! A small axum app: four catalog endpoints plus an index, all answering
//! with the uniform response envelope. Site work happens behind
//! [`Otakudesu`]; this layer routes, validates, and wraps.

pub mod error;
pub mod handlers;

pub use error::{ApiError, Envelope};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::sites::Otakudesu;

/// Ceiling on a whole request, above the per-strategy fetch timeouts, so a
/// stuck chain can never hold a connection open indefinitely.
const REQUEST_DEADLINE: Duration = Duration::from_secs(90);

/// Assemble the application router around one catalog service.
#[must_use]
pub fn router(catalog: Arc<Otakudesu>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/ongoing", get(handlers::ongoing))
        .route("/api/search", get(handlers::search))
        .route("/api/anime/:id", get(handlers::anime_detail))
        .route("/api/stream", get(handlers::stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(REQUEST_DEADLINE))
        .with_state(catalog)
}

/// Bind the listener and serve until ctrl-c.
pub async fn serve(app: Router, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with an error")
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("ctrl-c handler should install");
    info!("Shutdown signal received, draining connections");
}
