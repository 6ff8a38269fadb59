//! Prometheus scrape endpoint.

use axum::extract::State;
use axum::http::header;
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics — order counters and HTTP error counters in text format.
pub async fn get(
    State(handle): State<PrometheusHandle>,
) -> ([(header::HeaderName, &'static str); 1], String) {
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], handle.render())
}
