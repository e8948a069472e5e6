//! Asset cache implementation.

use crate::CacheKey;
use derive_getters::Getters;
use mediaref_core::Asset;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolved assets keyed by every identity they carry.
///
/// An asset with both a `ref` and a `uuid` is stored once and reachable
/// under both keys. Discovery order is the order of first registration.
///
/// # Example
///
/// ```
/// use mediaref_cache::{AssetCache, CacheKey};
/// use mediaref_core::{Asset, AssetMetadata, MediaUri};
/// use std::sync::Arc;
///
/// let metadata = AssetMetadata::builder()
///     .reference("Song")
///     .uuid("0001")
///     .kind("audio")
///     .build()
///     .unwrap();
/// let uri = MediaUri::parse("ref:Song").unwrap();
/// let asset = Asset::from_metadata(&uri, metadata).unwrap();
///
/// let mut cache = AssetCache::new();
/// let stored = cache.register(asset);
///
/// let by_uuid = cache.get(&CacheKey::from("uuid:0001")).unwrap();
/// assert!(Arc::ptr_eq(&stored, &by_uuid));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default, Getters)]
pub struct AssetCache {
    /// Every identity key to its asset
    #[getter(skip)]
    entries: HashMap<CacheKey, Arc<Asset>>,
    /// Unique assets in registration order
    #[getter(skip)]
    discovery_order: Vec<Arc<Asset>>,
    /// Bumped by every [`AssetCache::clear`]
    generation: u64,
}

impl AssetCache {
    /// Create an empty cache at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an asset by any of its keys.
    #[tracing::instrument(skip(self), fields(key = %key, cached = self.discovery_order.len()))]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Asset>> {
        let found = self.entries.get(key).cloned();
        tracing::debug!(hit = found.is_some(), "Asset cache lookup");
        found
    }

    /// First cached asset among `keys`.
    pub fn find_any<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Option<Arc<Asset>> {
        keys.into_iter()
            .find_map(|key| self.entries.get(&CacheKey::from(key)))
            .cloned()
    }

    /// Whether `key` is cached.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `asset` under all of its identity keys and append it to the
    /// discovery order.
    ///
    /// When one of those keys is already taken the cached asset wins and is
    /// returned instead; nothing is appended.
    #[tracing::instrument(skip_all, fields(generation = self.generation))]
    pub fn register(&mut self, asset: impl Into<Arc<Asset>>) -> Arc<Asset> {
        let asset: Arc<Asset> = asset.into();
        let keys: Vec<CacheKey> = asset.identity_keys().into_iter().map(CacheKey::from).collect();
        if let Some(existing) = keys.iter().find_map(|key| self.entries.get(key)) {
            tracing::debug!(existing = %existing.key(), "Asset already registered");
            return Arc::clone(existing);
        }

        for key in keys {
            self.entries.insert(key, Arc::clone(&asset));
        }
        self.discovery_order.push(Arc::clone(&asset));
        tracing::debug!(
            key = %asset.key(),
            position = self.discovery_order.len(),
            kind = %asset.kind(),
            "Registered asset"
        );
        asset
    }

    /// Make `existing` reachable under every key in `keys` that is still free.
    ///
    /// Used when a later record names an identity the cached asset was
    /// registered without. The discovery order is unchanged.
    pub fn alias(
        &mut self,
        keys: impl IntoIterator<Item = impl Into<CacheKey>>,
        existing: &Arc<Asset>,
    ) {
        for key in keys {
            let key = key.into();
            if !self.entries.contains_key(&key) {
                tracing::debug!(key = %key, asset = %existing.key(), "Aliasing asset key");
                self.entries.insert(key, Arc::clone(existing));
            }
        }
    }

    /// Assets in discovery order.
    pub fn assets(&self) -> &[Arc<Asset>] {
        &self.discovery_order
    }

    /// Number of unique assets.
    pub fn len(&self) -> usize {
        self.discovery_order.len()
    }

    /// Whether no asset is cached.
    pub fn is_empty(&self) -> bool {
        self.discovery_order.is_empty()
    }

    /// Forget every asset and start a new generation.
    pub fn clear(&mut self) {
        let count = self.discovery_order.len();
        self.entries.clear();
        self.discovery_order.clear();
        self.generation += 1;
        tracing::info!(cleared = count, generation = self.generation, "Cleared asset cache");
    }
}
