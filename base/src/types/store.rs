use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::{traits::store::TimestampStore, types::timestamp::UnixTimestamp};

/// Lock-free single-value store.
///
/// Every `store` publishes a fresh immutable value with one atomic pointer swap,
/// and every `get` loads the current pointer with one atomic load. Readers never
/// wait on writers and can only ever see a fully written value.
#[derive(Debug)]
pub struct AtomicTimestampStore {
    current: ArcSwap<UnixTimestamp>,
}

impl AtomicTimestampStore {
    pub fn new(initial: UnixTimestamp) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }
}

impl Default for AtomicTimestampStore {
    fn default() -> Self {
        Self::new(UnixTimestamp::EPOCH)
    }
}

impl TimestampStore for AtomicTimestampStore {
    fn store(&self, timestamp: UnixTimestamp) {
        self.current.store(Arc::new(timestamp));
    }

    fn get(&self) -> UnixTimestamp {
        **self.current.load()
    }
}
