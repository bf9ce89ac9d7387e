//! # Prometheus Metrics
//!
//! Request and domain counters recorded through the `metrics` facade.
//! When the binary installs the Prometheus recorder, `/metrics` renders them
//! in text exposition format; without a recorder every call is a no-op.
//!
//! | Metric                             | Labels                     |
//! |------------------------------------|----------------------------|
//! | `dzone_http_requests_total`        | `method`, `status`         |
//! | `dzone_classifications_total`      | `outcome`, `zone`          |
//! | `dzone_stale_completions_total`    |                            |

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use dzone_zones::Classification;

/// Install the global Prometheus recorder and return its render handle.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Middleware that counts requests by method and status.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let response = next.run(request).await;
    let status = response.status().as_u16().to_string();
    metrics::counter!("dzone_http_requests_total", "method" => method, "status" => status)
        .increment(1);
    response
}

/// Count one classification by outcome and matched zone.
pub fn record_classification(classification: &Classification) {
    let zone = classification
        .zone_id()
        .map(|z| z.as_str().to_owned())
        .unwrap_or_default();
    metrics::counter!(
        "dzone_classifications_total",
        "outcome" => classification.kind(),
        "zone" => zone
    )
    .increment(1);
}

/// Count one async answer discarded because a newer input superseded it.
///
/// Unlabelled: a stale ticket's source is only what the caller claims.
pub fn record_stale_completion() {
    metrics::counter!("dzone_stale_completions_total").increment(1);
}
