//! Sample cache implementation.

use crate::CacheKey;
use mediaref_core::{Asset, Sample};
use std::collections::HashMap;
use std::sync::Arc;

/// Samples keyed by `{asset key}#{ref}`, grouped per asset in
/// registration order.
#[derive(Debug, Default)]
pub struct SampleCache {
    entries: HashMap<CacheKey, Arc<Sample>>,
    by_asset: HashMap<String, Vec<Arc<Sample>>>,
}

impl SampleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a sample.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Sample>> {
        let found = self.entries.get(key).cloned();
        tracing::debug!(hit = found.is_some(), "Sample cache lookup");
        found
    }

    /// Whether `key` is cached.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `sample`, or return the one already cached under its key.
    #[tracing::instrument(skip(self, sample), fields(key = %sample.key(), declared = *sample.declared()))]
    pub fn register(&mut self, sample: Sample) -> Arc<Sample> {
        let key = CacheKey::from(sample.key().as_str());
        if let Some(existing) = self.entries.get(&key) {
            tracing::debug!("Sample already registered");
            return Arc::clone(existing);
        }

        let sample = Arc::new(sample);
        self.by_asset
            .entry(sample.asset().key().clone())
            .or_default()
            .push(Arc::clone(&sample));
        self.entries.insert(key, Arc::clone(&sample));
        tracing::debug!("Registered sample");
        sample
    }

    /// Register every sample of one asset, keeping their order.
    pub fn register_all(&mut self, samples: impl IntoIterator<Item = Sample>) -> Vec<Arc<Sample>> {
        samples.into_iter().map(|s| self.register(s)).collect()
    }

    /// Samples of `asset` in registration order.
    pub fn samples_of(&self, asset: &Asset) -> &[Arc<Sample>] {
        self.by_asset
            .get(asset.key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Samples ordered by the given asset order, then registration order.
    pub fn export(&self, assets: &[Arc<Asset>]) -> Vec<Arc<Sample>> {
        assets
            .iter()
            .flat_map(|asset| self.samples_of(asset).iter().cloned())
            .collect()
    }

    /// Number of cached samples.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sample is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every sample.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.by_asset.clear();
        tracing::info!(cleared = count, "Cleared sample cache");
    }
}
