//! Prometheus metrics

use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;
use crate::ServerError;

pub const QUERIES_TOTAL: &str = "voxpedia_queries_total";
pub const QUERY_DURATION: &str = "voxpedia_query_duration_seconds";

/// Retry backoff alone is a minute per attempt, so buckets reach past it
const DURATION_BUCKETS: &[f64] = &[0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 180.0];

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(QUERY_DURATION.to_string()), DURATION_BUCKETS)
        .map_err(|e| ServerError::Metrics(e.to_string()))?
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;

    metrics::describe_counter!(QUERIES_TOTAL, "Voice queries by terminal outcome");
    metrics::describe_histogram!(
        QUERY_DURATION,
        metrics::Unit::Seconds,
        "End-to-end voice query latency"
    );

    Ok(handle)
}

/// Record one finished query
pub fn record_query(outcome: &'static str, elapsed: Duration) {
    metrics::counter!(QUERIES_TOTAL, "outcome" => outcome).increment(1);
    metrics::histogram!(QUERY_DURATION).record(elapsed.as_secs_f64());
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| ServerError::Metrics("metrics disabled".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
