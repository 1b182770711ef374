use futures::future::BoxFuture;

use super::errors::CacheError;
use super::types::{QueryKey, QuerySelector};

/// Contract for the key-addressed request/response cache.
///
/// Implemented by the application's cache adapter; the health subsystem
/// drives recovery and retry through this seam only.
///
/// # Semantics
///
/// - **Invalidate vs refetch**: `invalidate` only marks matching entries
///   stale; it never issues a request. `refetch` re-issues requests, and
///   with `active_only` restricts that to entries backing a mounted
///   consumer.
/// - **Idempotency**: every operation is idempotent. Invalidating a stale
///   entry, cancelling a settled request, or refetching an in-flight key
///   (single-flight coalescing) are all safe no-ops.
/// - **Cancellation**: `cancel` aborts any in-flight request for the key
///   and leaves the cached value untouched.
pub trait QueryCache: Send + Sync {
    /// Mark the selected entries stale.
    fn invalidate(&self, selector: QuerySelector) -> BoxFuture<'_, Result<(), CacheError>>;

    /// Re-issue requests for the selected entries.
    fn refetch(
        &self,
        selector: QuerySelector,
        active_only: bool,
    ) -> BoxFuture<'_, Result<(), CacheError>>;

    /// Abort any in-flight request for the key.
    fn cancel(&self, key: &QueryKey) -> BoxFuture<'_, Result<(), CacheError>>;

    /// Keys currently backing a mounted consumer.
    fn active_keys(&self) -> Vec<QueryKey>;

    /// Keys with a request currently in flight.
    fn fetching_keys(&self) -> Vec<QueryKey>;
}
