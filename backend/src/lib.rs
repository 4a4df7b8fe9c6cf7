mod backend_service;
mod handlers;
mod metrics;
mod models;
pub mod router;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use base::{
    cli::TimestampServerCli,
    types::{store::AtomicTimestampStore, timestamp::UnixTimestamp},
};
use prometheus::Registry;

use crate::router::{create_router, RouterConfig};

/// Sets up everything required to serve timestamps.
/// Returns the Axum Router and the store it serves, initialized to the epoch.
pub fn setup(
    cli: &TimestampServerCli,
    metrics_registry: Registry,
) -> Result<(Router, Arc<AtomicTimestampStore>), anyhow::Error> {
    let store = Arc::new(AtomicTimestampStore::new(UnixTimestamp::EPOCH));

    let config = RouterConfig {
        request_timeout: cli.timestamp_server_request_timeout,
        max_body_bytes: cli.timestamp_server_max_body_bytes,
        with_metrics_endpoint: cli.timestamp_server_metrics,
    };

    let router = create_router(store.clone(), metrics_registry, config)
        .context("unable to register HTTP metrics")?;

    Ok((router, store))
}
