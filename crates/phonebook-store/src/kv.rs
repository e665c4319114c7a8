//! The key-value store seam.

use std::future::Future;

use crate::error::StoreResult;

/// Trait abstracting the backing key-value store for testability.
///
/// [`RedisStore`](crate::RedisStore) implements this against a real Redis
/// server; [`MemoryStore`](crate::MemoryStore) keeps everything in process.
/// Each method is a single round-trip, and the conditional writes are atomic
/// on the store side, so callers never need a check-then-act sequence.
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    /// Plain lookup. `None` if the key does not exist.
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// Write only if the key does not exist yet (`SET .. NX`).
    /// Returns whether the write was applied.
    fn set_if_absent(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Write only if the key already exists (`SET .. XX`).
    /// Returns whether the write was applied.
    fn set_if_present(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Remove the key. Returns the number of keys removed (0 or 1).
    fn delete(&self, key: &str) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Liveness round-trip (`PING`).
    fn ping(&self) -> impl Future<Output = StoreResult<()>> + Send;
}
