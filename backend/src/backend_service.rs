use std::sync::Arc;

use base::{traits::store::TimestampStore, types::timestamp::UnixTimestamp};
use derive_new::new;

use crate::{metrics::StoreMetrics, models::ApiError};

/// Application context shared by all handlers.
///
/// This service is the only path from the HTTP layer to the timestamp store.
#[derive(Clone, new)]
pub struct TimestampService {
    /// Process-wide timestamp store
    store: Arc<dyn TimestampStore>,
    metrics: Arc<StoreMetrics>,
    /// Largest accepted update body, in bytes
    pub max_body_bytes: usize,
}

impl TimestampService {
    /// Parses the update body and, if it holds a valid timestamp, stores it.
    /// The store is left untouched on any error.
    pub fn update(&self, body: &[u8]) -> Result<UnixTimestamp, ApiError> {
        let timestamp = String::from_utf8_lossy(body).parse::<UnixTimestamp>()?;
        self.store.store(timestamp);
        self.metrics.stored_timestamp.set(timestamp.as_secs());
        Ok(timestamp)
    }

    /// Returns the currently stored timestamp.
    pub fn retrieve(&self) -> UnixTimestamp {
        self.store.get()
    }

    pub fn record_rejection(&self, err: &ApiError) {
        self.metrics
            .rejections
            .with_label_values(&[err.reason()])
            .inc();
    }
}
