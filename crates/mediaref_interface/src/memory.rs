//! In-memory implementation of MetadataFetcher.

use crate::MetadataFetcher;
use async_trait::async_trait;
use mediaref_core::{AssetMetadata, MediaUri};
use mediaref_error::{AssetError, AssetErrorKind, FetchError, MediaResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Metadata records held in a map.
///
/// Every record is indexed under `ref:{ref}` and `uuid:{uuid}`, so both
/// addressing modes find it. A record inserted later takes over every key
/// it names; a record is counted while at least one key still reaches it.
///
/// # Example
///
/// ```
/// use mediaref_interface::{InMemoryMetadataSource, MetadataFetcher};
/// use mediaref_core::MediaUri;
///
/// # #[tokio::main]
/// # async fn main() {
/// let source = InMemoryMetadataSource::from_json_str(r#"[
///     {"ref": "Song", "uuid": "0001", "kind": "audio"}
/// ]"#).await.unwrap();
///
/// let by_uuid = MediaUri::parse("uuid:0001").unwrap();
/// let record = source.fetch(&by_uuid).await.unwrap().unwrap();
/// assert_eq!(record.reference.as_deref(), Some("Song"));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataSource {
    records: Arc<RwLock<HashMap<String, Arc<AssetMetadata>>>>,
}

impl InMemoryMetadataSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of metadata records and index all of them.
    ///
    /// # Errors
    ///
    /// Fails when the JSON is not an array of records, or when a record has
    /// neither `ref` nor `uuid`.
    pub async fn from_json_str(json: &str) -> MediaResult<Self> {
        let records: Vec<AssetMetadata> = serde_json::from_str(json)
            .map_err(|e| FetchError::new(format!("Invalid metadata JSON: {}", e)))?;
        let source = Self::new();
        for record in records {
            source.insert(record).await?;
        }
        Ok(source)
    }

    /// Add a record, replacing any record previously stored under the same keys.
    ///
    /// # Errors
    ///
    /// [`AssetErrorKind::MissingIdentity`] when the record has neither
    /// `ref` nor `uuid`.
    pub async fn insert(&self, metadata: AssetMetadata) -> MediaResult<()> {
        let keys = metadata.identity_keys();
        if keys.is_empty() {
            let described = metadata
                .title
                .clone()
                .or_else(|| metadata.http_url.clone())
                .unwrap_or_else(|| "<untitled record>".to_string());
            return Err(AssetError::new(AssetErrorKind::MissingIdentity(described)).into());
        }

        let metadata = Arc::new(metadata);
        let mut records = self.records.write().await;
        for key in keys {
            tracing::trace!(key = %key, "Indexing metadata record");
            records.insert(key, Arc::clone(&metadata));
        }
        Ok(())
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records
            .read()
            .await
            .values()
            .map(Arc::as_ptr)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Whether no record is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MetadataFetcher for InMemoryMetadataSource {
    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn fetch(&self, key: &MediaUri) -> MediaResult<Option<AssetMetadata>> {
        let found = self
            .records
            .read()
            .await
            .get(&key.asset_key())
            .map(|record| record.as_ref().clone());
        tracing::debug!(found = found.is_some(), "Metadata lookup");
        Ok(found)
    }

    fn source_name(&self) -> &str {
        "memory"
    }
}
