//! The link-following resolver.

use crate::{ResolverConfig, SampleShortcutAssigner, ShortcutTable};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use mediaref_cache::{AssetCache, CacheKey, SampleCache};
use mediaref_core::{
    Asset, AssetMetadata, COMPLETE_SAMPLE_REF, MediaKind, MediaUri, Sample, SampleDefaults,
};
use mediaref_error::{
    AssetError, AssetErrorKind, MediaError, MediaResult, ResolverError, ResolverErrorKind,
    SampleError, SampleErrorKind,
};
use mediaref_interface::MetadataFetcher;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

type FetchOutcome = Result<Option<AssetMetadata>, MediaError>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// A fetch started in `generation` that later callers can join.
struct InFlight {
    generation: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct ResolverState {
    assets: AssetCache,
    samples: SampleCache,
    in_flight: HashMap<CacheKey, InFlight>,
}

/// Resolves media references into shared [`Asset`]s and [`Sample`]s.
///
/// Each asset is fetched once per generation. Resolving an asset also
/// resolves everything its metadata links to, depth first, before the call
/// returns. Concurrent requests for the same key share one fetch.
///
/// # Example
///
/// ```
/// use mediaref_interface::InMemoryMetadataSource;
/// use mediaref_resolver::Resolver;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = InMemoryMetadataSource::from_json_str(r#"[
///     {"ref": "Clip", "kind": "video", "cover": "ref:Still"},
///     {"ref": "Still", "kind": "image"}
/// ]"#).await?;
/// let resolver = Resolver::new(source);
///
/// let assets = resolver.resolve("ref:Clip").await?;
/// let keys: Vec<&str> = assets.iter().map(|a| a.key().as_str()).collect();
/// assert_eq!(keys, vec!["ref:Clip", "ref:Still"]);
///
/// let sample = resolver.resolve_sample("ref:Clip").await?;
/// assert_eq!(sample.reference(), "complete");
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    fetcher: Arc<dyn MetadataFetcher>,
    config: ResolverConfig,
    sample_defaults: SampleDefaults,
    state: Mutex<ResolverState>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("source", &self.fetcher.source_name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Resolver with the default configuration.
    pub fn new(fetcher: impl MetadataFetcher + 'static) -> Self {
        Self::with_config(fetcher, ResolverConfig::default())
    }

    /// Resolver with an explicit configuration.
    pub fn with_config(fetcher: impl MetadataFetcher + 'static, config: ResolverConfig) -> Self {
        debug!(
            source = fetcher.source_name(),
            max_link_depth = config.max_link_depth(),
            "Creating resolver"
        );
        Self {
            fetcher: Arc::new(fetcher),
            sample_defaults: config.sample_defaults(),
            config,
            state: Mutex::new(ResolverState::default()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the asset behind `raw`, and everything it links to.
    ///
    /// The fragment is ignored. A cached asset is returned as is, without
    /// fetching or following its links again.
    ///
    /// # Errors
    ///
    /// - `InvalidUri` for malformed references, including a malformed
    ///   `cover` on any record reached; that record is not registered
    /// - `NotFound` when the source knows no record for the asset or one
    ///   of its links; assets registered before the failure stay cached
    /// - `InvalidSampleSpec`, `UnknownMediaKind`, `IdentityMismatch` when a
    ///   record cannot be turned into an asset; nothing of it is registered
    /// - fetch failures as reported by the source
    /// - `Superseded` when [`Resolver::reset`] ran during a fetch
    #[instrument(skip(self))]
    pub async fn resolve_asset(&self, raw: &str) -> MediaResult<Arc<Asset>> {
        let uri = MediaUri::parse(raw)?;
        self.resolve_uri(&uri).await
    }

    /// [`Resolver::resolve_asset`] for an already parsed reference.
    #[instrument(skip(self, uri), fields(uri = %uri))]
    pub async fn resolve_uri(&self, uri: &MediaUri) -> MediaResult<Arc<Asset>> {
        let root = uri.without_fragment();
        if let Some(asset) = self.state.lock().await.assets.get(&CacheKey::asset(&root)) {
            debug!("Asset already resolved");
            return Ok(asset);
        }

        let mut resolved_root = None;
        let mut worklist: Vec<(MediaUri, usize)> = vec![(root, 0)];
        while let Some((next, depth)) = worklist.pop() {
            let cached = self.state.lock().await.assets.get(&CacheKey::asset(&next));
            let asset = match cached {
                Some(asset) => {
                    debug!(key = %next, "Link already resolved");
                    resolved_root.get_or_insert(asset);
                    continue;
                }
                None => self.fetch_and_register(&next).await?,
            };
            resolved_root.get_or_insert_with(|| Arc::clone(&asset));

            if *self.config.follow_links() {
                self.push_links(&asset, depth, &mut worklist)?;
            }
        }

        resolved_root.ok_or_else(|| {
            AssetError::new(AssetErrorKind::NotFound(uri.asset_key())).into()
        })
    }

    /// Queue the links of `asset` so that the first one is resolved next.
    fn push_links(
        &self,
        asset: &Asset,
        depth: usize,
        worklist: &mut Vec<(MediaUri, usize)>,
    ) -> MediaResult<()> {
        let links = asset.metadata().link_references()?;
        if links.is_empty() {
            return Ok(());
        }
        if depth + 1 > *self.config.max_link_depth() {
            warn!(
                asset = %asset.key(),
                depth,
                skipped = links.len(),
                "Link depth limit reached, not following links"
            );
            return Ok(());
        }
        debug!(asset = %asset.key(), links = links.len(), "Following links");
        worklist.extend(
            links
                .into_iter()
                .rev()
                .map(|link| (link.without_fragment(), depth + 1)),
        );
        Ok(())
    }

    /// Fetch one asset (joining a fetch already in flight for the same key),
    /// validate it with its samples, and register both.
    #[instrument(skip(self, uri), fields(key = %uri))]
    async fn fetch_and_register(&self, uri: &MediaUri) -> MediaResult<Arc<Asset>> {
        let key = CacheKey::asset(uri);
        let (generation, fetch) = {
            let mut state = self.state.lock().await;
            if let Some(asset) = state.assets.get(&key) {
                return Ok(asset);
            }
            let generation = *state.assets.generation();
            let joinable = state
                .in_flight
                .get(&key)
                .filter(|in_flight| in_flight.generation == generation)
                .map(|in_flight| in_flight.fetch.clone());
            match joinable {
                Some(fetch) => {
                    debug!("Joining in-flight fetch");
                    (generation, fetch)
                }
                None => {
                    debug!(source = self.fetcher.source_name(), generation, "Fetching metadata");
                    let fetch = self.start_fetch(uri.clone());
                    state.in_flight.insert(
                        key.clone(),
                        InFlight {
                            generation,
                            fetch: fetch.clone(),
                        },
                    );
                    (generation, fetch)
                }
            }
        };

        let outcome = fetch.await;

        let mut state = self.state.lock().await;
        if state
            .in_flight
            .get(&key)
            .is_some_and(|in_flight| in_flight.generation == generation)
        {
            state.in_flight.remove(&key);
        }

        let current = *state.assets.generation();
        if current != generation {
            warn!(started = generation, current, "Discarding fetch result after reset");
            return Err(ResolverError::new(ResolverErrorKind::Superseded {
                key: key.to_string(),
                started: generation,
                current,
            })
            .into());
        }
        if let Some(asset) = state.assets.get(&key) {
            return Ok(asset);
        }

        let metadata =
            outcome?.ok_or_else(|| AssetError::new(AssetErrorKind::NotFound(key.to_string())))?;
        let asset = Asset::from_metadata(uri, metadata)?;
        if let Some(existing) = state
            .assets
            .find_any(asset.identity_keys().iter().map(String::as_str))
        {
            debug!(existing = %existing.key(), "Record already registered under another key");
            state.assets.alias(asset.identity_keys(), &existing);
            return Ok(existing);
        }
        if *self.config.follow_links()
            && let Err(e) = asset.metadata().link_references()
        {
            warn!(asset = %asset.key(), error = %e, "Rejecting asset with a malformed link");
            return Err(e);
        }

        let asset = Arc::new(asset);
        let samples = Sample::declared_for(&asset, &self.sample_defaults)?;
        let asset = state.assets.register(asset);
        state.samples.register_all(samples);
        Ok(asset)
    }

    fn start_fetch(&self, uri: MediaUri) -> SharedFetch {
        let fetcher = Arc::clone(&self.fetcher);
        async move { fetcher.fetch(&uri).await }.boxed().shared()
    }

    /// Resolve `raw`, then return every asset known so far in discovery order.
    #[instrument(skip(self))]
    pub async fn resolve(&self, raw: &str) -> MediaResult<Vec<Arc<Asset>>> {
        self.resolve_asset(raw).await?;
        Ok(self.export_assets().await)
    }

    /// Resolve the sample named by the fragment of `raw` (`complete` when
    /// there is none).
    ///
    /// A fragment no declaration names is minted into a new sample and
    /// registered under its asset, unless the configuration forbids it.
    /// Part selections such as `#2-3` are only sample names when declared
    /// as such; otherwise they are rejected with `InvalidSampleSpec`.
    #[instrument(skip(self))]
    pub async fn resolve_sample(&self, raw: &str) -> MediaResult<Arc<Sample>> {
        let uri = MediaUri::parse(raw)?;
        let started = self.generation().await;
        let asset = self.resolve_uri(&uri).await?;
        let reference = uri.fragment().unwrap_or(COMPLETE_SAMPLE_REF);
        let key = CacheKey::sample(&asset, reference);

        let mut state = self.state.lock().await;
        if let Some(sample) = state.samples.get(&key) {
            return Ok(sample);
        }
        if state
            .assets
            .get(&CacheKey::from(asset.key().as_str()))
            .is_none_or(|cached| !Arc::ptr_eq(&cached, &asset))
        {
            return Err(ResolverError::new(ResolverErrorKind::Superseded {
                key: key.to_string(),
                started,
                current: *state.assets.generation(),
            })
            .into());
        }
        if uri.part_selection().is_some() {
            return Err(SampleError::invalid_spec(
                key.to_string(),
                "fragment selects parts of the asset, not a sample",
            )
            .into());
        }
        if !*self.config.mint_unknown_samples() {
            return Err(SampleError::new(SampleErrorKind::UndeclaredSample(key.to_string())).into());
        }

        warn!(sample = %key, "Sample not declared in metadata, minting it");
        let sample = Sample::minted(&asset, reference, &self.sample_defaults)?;
        Ok(state.samples.register(sample))
    }

    /// Cached asset behind `raw`; `None` for unknown or malformed references.
    pub async fn get_asset(&self, raw: &str) -> Option<Arc<Asset>> {
        let uri = MediaUri::parse(raw).ok()?;
        self.state.lock().await.assets.get(&CacheKey::asset(&uri))
    }

    /// Cached sample behind `raw`; `None` for unknown or malformed references.
    pub async fn get_sample(&self, raw: &str) -> Option<Arc<Sample>> {
        let uri = MediaUri::parse(raw).ok()?;
        let state = self.state.lock().await;
        let asset = state.assets.get(&CacheKey::asset(&uri))?;
        let reference = uri.fragment().unwrap_or(COMPLETE_SAMPLE_REF);
        state.samples.get(&CacheKey::sample(&asset, reference))
    }

    /// Every cached asset in discovery order.
    pub async fn export_assets(&self) -> Vec<Arc<Asset>> {
        self.state.lock().await.assets.assets().to_vec()
    }

    /// Every cached sample, by asset discovery order, then declaration order.
    pub async fn export_samples(&self) -> Vec<Arc<Sample>> {
        let state = self.state.lock().await;
        state.samples.export(state.assets.assets())
    }

    /// Shortcut labels for the cached samples of `kind`.
    #[instrument(skip(self))]
    pub async fn get_sample_shortcuts(&self, kind: MediaKind) -> ShortcutTable {
        let samples = self.export_samples().await;
        SampleShortcutAssigner::assign(kind, &samples)
    }

    /// Forget everything and start a new generation.
    ///
    /// Fetches still running finish, but their results are dropped.
    #[instrument(skip(self))]
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let pending = state.in_flight.len();
        state.assets.clear();
        state.samples.clear();
        state.in_flight.clear();
        info!(
            generation = state.assets.generation(),
            pending_fetches = pending,
            "Resolver reset"
        );
    }

    /// Number of unique cached assets.
    pub async fn asset_count(&self) -> usize {
        self.state.lock().await.assets.len()
    }

    /// Number of cached samples.
    pub async fn sample_count(&self) -> usize {
        self.state.lock().await.samples.len()
    }

    /// Current generation; bumped by every [`Resolver::reset`].
    pub async fn generation(&self) -> u64 {
        *self.state.lock().await.assets.generation()
    }
}
