//! HTTP service around `readable-core`.
//!
//! Routes:
//!
//! - `GET /healthcheck` answers `"OK"`
//! - `GET /convert?url=` fetches a page and returns its article markup
//! - `POST /read` takes a URL or raw HTML and returns title and plain text
//!
//! Failures answer with `{ "title": "", "text": "", "error": "<message>" }`
//! and a status derived from the error kind.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use readable_core::{FetchConfig, Readability};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub reader: Readability,
    pub fetch: FetchConfig,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            reader: Readability::new(),
            fetch: FetchConfig { timeout: config.fetch_timeout, ..Default::default() },
            request_timeout: config.request_timeout,
        }
    }
}

/// Builds the router with CORS open to every origin and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthcheck", get(routes::healthcheck))
        .route("/convert", get(routes::convert))
        .route("/read", post(routes::read))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
