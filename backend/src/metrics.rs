use std::{sync::Arc, time::Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_with_registry, Encoder, HistogramVec, IntCounterVec, IntGauge, Registry,
    TextEncoder,
};
use tracing::error;

use crate::models::error_response;

pub const HTTP_DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.025, 0.1, 0.5, 2.0];

#[derive(Clone)]
pub struct HttpMetrics {
    pub requests: IntCounterVec,
    pub duration: HistogramVec,
}

impl HttpMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            requests: register_int_counter_vec_with_registry!(
                "timestamp_server_http_requests_total",
                "Timestamp Server: Total number of HTTP requests",
                &["method", "endpoint", "status"],
                registry
            )?,
            duration: register_histogram_vec_with_registry!(
                "timestamp_server_http_request_duration_seconds",
                "Timestamp Server: HTTP request latency in seconds",
                &["method", "endpoint"],
                HTTP_DURATION_BUCKETS.to_vec(),
                registry
            )?,
        })
    }
}

/// Metrics describing what happens to the stored timestamp.
#[derive(Clone)]
pub struct StoreMetrics {
    /// Update requests rejected, by reason
    pub rejections: IntCounterVec,
    /// Seconds value of the last stored timestamp
    pub stored_timestamp: IntGauge,
}

impl StoreMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            rejections: register_int_counter_vec_with_registry!(
                "timestamp_server_update_rejections_total",
                "Timestamp Server: Total number of rejected timestamp updates",
                &["reason"],
                registry
            )?,
            stored_timestamp: register_int_gauge_with_registry!(
                "timestamp_server_stored_timestamp_seconds",
                "Timestamp Server: Last stored timestamp in seconds since the UNIX epoch",
                registry
            )?,
        })
    }
}

pub async fn metrics_middleware(
    State(state): State<Arc<HttpMetrics>>,
    matched_path: Option<MatchedPath>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = matched_path
        .as_ref()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let response = next.run(req).await;
    let status = response.status().as_u16().to_string();

    state
        .requests
        .with_label_values(&[method.as_str(), path.as_str(), status.as_str()])
        .inc();

    state
        .duration
        .with_label_values(&[method.as_str(), path.as_str()])
        .observe(start.elapsed().as_secs_f64());

    response
}

pub async fn metrics_handler(State(registry): State<Registry>) -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    if let Err(err) = encoder.encode(&registry.gather(), &mut buffer) {
        error!(error = %err, "unable to encode metrics");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "unable to encode metrics");
    }
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}
