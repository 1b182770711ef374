use serde::{Deserialize, Serialize};

/// Opaque, structurally comparable identifier for a cache entry.
///
/// Keys are ordered segment lists (`["plans", "42", "tasks"]`), compared
/// structurally. The cache owns what a key means; this layer only needs
/// equality and hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for QueryKey {
    fn from(segment: &str) -> Self {
        Self(vec![segment.to_string()])
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Selects cache entries for a bulk operation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuerySelector {
    /// Every entry in the cache.
    All,
    /// Entries currently backing a mounted consumer.
    Active,
    /// Exactly one entry.
    Key(QueryKey),
}
