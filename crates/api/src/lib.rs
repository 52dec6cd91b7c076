//! Stub HTTP endpoints for progress sync.
//!
//! Every handler logs what it received and answers with success after a
//! short artificial delay. Nothing is stored.

#![forbid(unsafe_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod health;

pub use error::ApiError;

/// Artificial latency per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    pub save_delay: Duration,
    pub export_delay: Duration,
    pub load_delay: Duration,
}

impl ApiConfig {
    /// No delays, for tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            save_delay: Duration::ZERO,
            export_delay: Duration::ZERO,
            load_delay: Duration::ZERO,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            save_delay: Duration::from_millis(200),
            export_delay: Duration::from_millis(500),
            load_delay: Duration::from_millis(100),
        }
    }
}

/// Shared state for handlers.
#[derive(Debug, Clone, Default)]
pub struct ApiState {
    pub config: ApiConfig,
}

impl ApiState {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/save-progress", post(handlers::save_progress))
        .route("/api/export-data", post(handlers::export_data))
        .route("/api/load-progress", get(handlers::load_progress))
        .route("/api/submit-form", post(handlers::submit_form))
        .merge(health::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
///
/// # Errors
///
/// Returns the I/O error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: ApiState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

/// Serve on an already bound listener.
///
/// # Errors
///
/// Returns the I/O error if the server fails.
pub async fn serve_on(listener: tokio::net::TcpListener, state: ApiState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("intake api listening on http://{addr}");
    info!("health check: http://{addr}/health");
    axum::serve(listener, build_router(state)).await
}
