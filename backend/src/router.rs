use std::{sync::Arc, time::Duration};

use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, on, put, MethodFilter},
    Router,
};
use base::{cli::DEFAULT_MAX_BODY_BYTES, traits::store::TimestampStore};
use prometheus::Registry;
use tower_http::timeout::TimeoutLayer;

use crate::{
    backend_service::TimestampService,
    handlers::{
        logging_middleware, method_not_allowed_handler, not_found_handler, retrieve_handler,
        update_handler, update_method_not_allowed_handler,
    },
    metrics::{metrics_handler, metrics_middleware, HttpMetrics, StoreMetrics},
};

pub const UPDATE_PATH: &str = "/update";
pub const RETRIEVE_PATH: &str = "/retrieve";
pub const METRICS_PATH: &str = "/metrics";

/// Options for the HTTP surface.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Requests running longer than this are answered with 408
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
    pub with_metrics_endpoint: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            with_metrics_endpoint: false,
        }
    }
}

pub fn create_router(
    store: Arc<dyn TimestampStore>,
    registry: Registry,
    config: RouterConfig,
) -> Result<Router, prometheus::Error> {
    let store_metrics = Arc::new(StoreMetrics::new(&registry)?);
    let http_metrics = Arc::new(HttpMetrics::new(&registry)?);
    let service = TimestampService::new(store, store_metrics, config.max_body_bytes);

    let api_router = Router::new()
        .route(
            UPDATE_PATH,
            put(update_handler).fallback(update_method_not_allowed_handler),
        )
        .route(
            RETRIEVE_PATH,
            // `get` would also answer HEAD
            on(MethodFilter::GET, retrieve_handler).fallback(method_not_allowed_handler),
        )
        .fallback(not_found_handler)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(from_fn_with_state(http_metrics, metrics_middleware))
        .layer(from_fn(logging_middleware))
        .with_state(service);

    // Optionally add /metrics endpoint
    let metrics_router = if config.with_metrics_endpoint {
        Router::new()
            .route(METRICS_PATH, get(metrics_handler))
            .with_state(registry)
    } else {
        Router::new()
    };

    Ok(api_router.merge(metrics_router))
}
