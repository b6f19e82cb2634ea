//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health` - Health check: storage and commission rate
//! - `/api/*`       - Booking REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router served by the binary.
///
/// The rate limiter keys on the peer address, so the router has to be served
/// with connect info.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::api_routes().layer(rate_limit::layer());

    NormalizePathLayer::trim_trailing_slash().layer(build(state, api_router))
}

/// Same routes as [`app_router`] without rate limiting or path normalization.
///
/// Used where requests carry no peer address, such as in-process tests.
pub fn unthrottled_router(state: AppState) -> Router {
    build(state, api::routes::api_routes())
}

fn build(state: AppState, api_router: Router<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
