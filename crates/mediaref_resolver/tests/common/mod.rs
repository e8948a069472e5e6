//! Metadata fetchers shared by the resolver tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mediaref_core::{AssetMetadata, MediaUri};
use mediaref_error::MediaResult;
use mediaref_interface::{InMemoryMetadataSource, MetadataFetcher};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

const FIXTURES: &str = include_str!("../fixtures/assets.json");

/// The fixture records behind an in-memory source.
pub async fn fixture_source() -> InMemoryMetadataSource {
    InMemoryMetadataSource::from_json_str(FIXTURES)
        .await
        .expect("fixture JSON is valid")
}

/// Counts fetches per key and can hold every fetch until released.
#[derive(Clone)]
pub struct CountingFetcher {
    inner: InMemoryMetadataSource,
    fetches: Arc<Mutex<HashMap<String, usize>>>,
    gate: Option<Arc<Gate>>,
}

/// Holds fetches open until the test lets them through.
#[derive(Default)]
pub struct Gate {
    started: Notify,
    release: Notify,
}

impl Gate {
    /// Wait until a fetch is waiting at the gate.
    pub async fn wait_for_fetch(&self) {
        self.started.notified().await;
    }

    /// Let one waiting (or the next) fetch through.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

impl CountingFetcher {
    pub async fn new() -> Self {
        Self::over(fixture_source().await)
    }

    pub fn over(inner: InMemoryMetadataSource) -> Self {
        Self {
            inner,
            fetches: Arc::new(Mutex::new(HashMap::new())),
            gate: None,
        }
    }

    pub async fn gated() -> (Self, Arc<Gate>) {
        let gate = Arc::new(Gate::default());
        let mut fetcher = Self::new().await;
        fetcher.gate = Some(Arc::clone(&gate));
        (fetcher, gate)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }

    pub fn fetches_of(&self, key: &str) -> usize {
        self.fetches.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl MetadataFetcher for CountingFetcher {
    async fn fetch(&self, key: &MediaUri) -> MediaResult<Option<AssetMetadata>> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(key.raw().to_string())
            .or_default() += 1;
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        self.inner.fetch(key).await
    }

    fn source_name(&self) -> &str {
        "counting"
    }
}
