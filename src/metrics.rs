//! Prometheus exposition for the fetch-pipeline counters.

use axum::{routing::get, Router};
use metrics::gauge;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the global recorder and return a router serving `/metrics`.
/// Call once at startup, before the first fetch pass records anything.
pub fn init_metrics() -> Router {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("prometheus: install recorder");

    gauge!("newswatch_started_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    Router::new().route(
        "/metrics",
        get(move || {
            let h = handle.clone();
            async move { h.render() }
        }),
    )
}
