/// Errors surfaced by a cache implementation.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("no cache entry for key: {0}")]
    EntryNotFound(String),

    #[error("cache backend failure: {0}")]
    Backend(String),
}
