//! The metadata fetch trait.

use async_trait::async_trait;
use mediaref_core::{AssetMetadata, MediaUri};
use mediaref_error::MediaResult;
use std::sync::Arc;

/// Source of raw metadata records.
///
/// `fetch` is the resolver's only suspension point. It receives the
/// fragment-free reference of one asset and answers with its record,
/// `Ok(None)` when nothing is known under that key, or an error when the
/// source itself failed. Errors are passed to the caller unchanged and
/// never retried.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Look up the record addressed by `key`.
    async fn fetch(&self, key: &MediaUri) -> MediaResult<Option<AssetMetadata>>;

    /// Name used in log output (e.g., "memory", "http").
    fn source_name(&self) -> &str {
        "unnamed"
    }
}

#[async_trait]
impl<T: MetadataFetcher + ?Sized> MetadataFetcher for Arc<T> {
    async fn fetch(&self, key: &MediaUri) -> MediaResult<Option<AssetMetadata>> {
        (**self).fetch(key).await
    }

    fn source_name(&self) -> &str {
        (**self).source_name()
    }
}
