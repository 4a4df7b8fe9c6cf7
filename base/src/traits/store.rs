use mockall::automock;

use crate::types::timestamp::UnixTimestamp;

/// Holds a single timestamp shared by all request handlers.
///
/// Implementations must be safe to call from any number of threads at once
/// without an external lock, and `get` must never observe a value that was
/// not passed to some completed `store`.
#[automock]
pub trait TimestampStore: Send + Sync {
    /// Replaces the held value. Never fails.
    fn store(&self, timestamp: UnixTimestamp);
    /// Returns the value of the last completed `store`, or the epoch if there was none.
    fn get(&self) -> UnixTimestamp;
}
