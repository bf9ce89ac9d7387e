//! # dzone-api — Axum API Services
//!
//! HTTP service for delivery-zone resolution, built on Axum/Tower/Tokio.
//!
//! ## Routes
//!
//! - `/v1/zones`, `/v1/zones/classify` — zone catalog and stateless classification
//! - `/v1/sessions/*` — checkout address sessions over `AddressState`
//! - `/health/*` — Kubernetes health probes
//! - `/metrics` — Prometheus text exposition
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → metrics middleware
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers. Classification lives in
//!   dzone-zones and the address lifecycle in dzone-state.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` sit outside the metrics middleware so that
/// scrapes do not count themselves.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::zones::router())
        .merge(routes::sessions::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(prometheus_metrics))
        .with_state(state);

    Router::new().merge(ops).merge(api)
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The registry is loaded before the listener binds, so a
/// running server is always ready.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics — Prometheus scrape endpoint.
async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => AppError::Unavailable("metrics recorder not installed".into()).into_response(),
    }
}
