//! Cache lifecycle management
//!
//! [`PackageCache`] decides where package data comes from, keeps it fresh and
//! writes it back to disk. Sources are tried in a fixed order:
//!
//! 1. the cache's own snapshot file (`cache_path`),
//! 2. npm's registry mirror (`local_cache_path`, when `use_local`),
//! 3. a full fetch from the registry.
//!
//! Anything taken from (2) or (3) passes the configured keyword filter and is
//! written to `cache_path` afterwards. A stale snapshot is topped up with a
//! delta fetch since its last known timestamp.

use crate::config::defaults;
use crate::core::keywords::{filter_by_keywords, matches_keywords};
use crate::core::metadata::{CacheState, CacheStatus, MetadataSource};
use crate::core::options::CacheOptions;
use crate::core::package::{PackageSet, Snapshot};
use crate::core::search::filter_by_query;
use crate::error::CacheError;
use crate::infra::filesystem::now_millis;
use crate::registry::cache::{LoadedSnapshot, SnapshotFile};
use crate::registry::client::{RegistryClient, RegistrySource};

/// A local, searchable snapshot of registry metadata
///
/// Operations take `&mut self`, so pipelines on one instance never overlap.
/// Wrap the cache in a `tokio::sync::Mutex` to share it between tasks.
#[derive(Debug)]
pub struct PackageCache<R = RegistryClient> {
    options: CacheOptions,
    registry: R,
    state: CacheState,
}

impl PackageCache<RegistryClient> {
    /// Create a cache talking to the registry named in `options`
    pub fn new(options: CacheOptions) -> Self {
        let registry = RegistryClient::from_options(&options);
        Self::with_registry(options, registry)
    }
}

impl<R: RegistrySource> PackageCache<R> {
    /// Create a cache backed by a custom registry source
    pub fn with_registry(options: CacheOptions, registry: R) -> Self {
        Self {
            options,
            registry,
            state: CacheState::new(),
        }
    }

    /// The options this cache was built with
    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Current in-memory packages (empty until [`Self::init`] completed)
    pub fn packages(&self) -> &PackageSet {
        self.state.packages()
    }

    pub fn status(&self) -> CacheStatus {
        self.state.status()
    }

    pub fn state(&self) -> &CacheState {
        &self.state
    }

    /// When the package data was last known to be current (epoch millis)
    pub fn updated_at(&self) -> Option<i64> {
        self.state.updated_at()
    }

    /// Whether memory holds changes not yet written to `cache_path`
    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Result of the most recent successful search
    pub fn last_result(&self) -> Option<&PackageSet> {
        self.state.last_result()
    }

    /// Forget everything in memory; files on disk are left alone
    pub fn reset(&mut self) {
        tracing::debug!("Resetting cache state");
        self.state.reset();
    }

    /// Load the cache, building it if needed
    ///
    /// Returns immediately once loaded. Fails only when the chosen source
    /// fails; a failed top-up of a stale snapshot is logged and the snapshot
    /// is kept.
    pub async fn init(&mut self) -> Result<&PackageSet, CacheError> {
        if self.state.is_loaded() {
            tracing::debug!("Cache already loaded, skipping");
            return Ok(self.state.packages());
        }

        self.state.begin_loading();
        if let Err(e) = self.load().await {
            self.state.abort_loading();
            return Err(e);
        }

        if let Err(e) = self.update_from_registry().await {
            tracing::warn!("Could not refresh stale cache, using it as is: {}", e);
        }

        self.persist().await?;
        Ok(self.state.packages())
    }

    /// Pull updates from the registry regardless of age, then persist
    ///
    /// An unloaded cache is loaded first, so the delta starts from whatever
    /// snapshot is on disk.
    pub async fn refresh(&mut self) -> Result<&PackageSet, CacheError> {
        if !self.state.is_loaded() {
            self.state.begin_loading();
            if let Err(e) = self.load().await {
                self.state.abort_loading();
                return Err(e);
            }
        }

        self.state.mark_stale();
        self.update_from_registry().await?;
        self.persist().await?;
        Ok(self.state.packages())
    }

    /// Search the cache
    ///
    /// Loads the cache first. `keywords`, when given, narrows the candidates
    /// before the query runs (independently of the configured keywords).
    /// An empty result is [`CacheError::NoResults`].
    pub async fn search(
        &mut self,
        query: &str,
        keywords: Option<&[String]>,
    ) -> Result<PackageSet, CacheError> {
        self.init().await?;

        let candidates = self
            .state
            .packages()
            .iter()
            .filter(|(_, record)| keywords.map_or(true, |k| matches_keywords(record, k)));
        let result = filter_by_query(candidates, &self.options.search_fields, query);

        tracing::debug!("Search for '{}' matched {} packages", query, result.len());

        if result.is_empty() {
            return Err(CacheError::NoResults {
                query: query.to_string(),
            });
        }

        self.state.set_last_result(result.clone());
        Ok(result)
    }

    /// Populate state from the first available source
    ///
    /// Each source is read completely before state is touched.
    async fn load(&mut self) -> Result<(), CacheError> {
        let ttl = self.options.ttl_millis();
        let cache_file = SnapshotFile::new(&self.options.cache_path);
        let mirror = SnapshotFile::new(&self.options.local_cache_path);

        tracing::debug!("Checking for caches in following places:");
        tracing::debug!("  Local cache      : {}", cache_file.path().display());
        tracing::debug!("  Local user cache : {}", mirror.path().display());

        if cache_file.exists().await {
            tracing::debug!("Local cache exists: {}", cache_file.path().display());
            let LoadedSnapshot { modified, snapshot } = cache_file.load().await?;
            self.track_file(modified, snapshot, ttl);
            return Ok(());
        }

        if self.options.use_local && mirror.exists().await {
            tracing::debug!("Local user cache exists: {}", mirror.path().display());
            let LoadedSnapshot { modified, snapshot } = mirror.load().await?;
            let snapshot = self.keyword_filtered(snapshot);
            self.track_file(modified, snapshot, ttl);
            // The filtered subset only exists in memory until written
            self.state.mark_dirty();
            return Ok(());
        }

        tracing::debug!("No cache exists, loading from registry");
        let snapshot = self
            .registry
            .fetch_since(defaults::DEFAULT_SINCE_MILLIS)
            .await?;
        let snapshot = self.keyword_filtered(snapshot);
        self.state
            .update_metadata(MetadataSource::Snapshot(snapshot), ttl, now_millis());
        self.state.mark_dirty();
        Ok(())
    }

    fn track_file(&mut self, modified: i64, snapshot: Snapshot, ttl: i64) {
        let now = now_millis();
        self.state
            .update_metadata(MetadataSource::FileModified(modified), ttl, now);
        self.state
            .update_metadata(MetadataSource::Snapshot(snapshot), ttl, now);
    }

    /// Merge registry changes since `updated_at` into a stale cache
    async fn update_from_registry(&mut self) -> Result<(), CacheError> {
        if !self.state.is_stale() {
            return Ok(());
        }

        let since = self
            .state
            .updated_at()
            .unwrap_or(defaults::DEFAULT_SINCE_MILLIS);
        tracing::info!("Package data expired, fetching changes since {}", since);

        let delta = self.registry.fetch_since(since).await?;
        let delta = self.keyword_filtered(delta);
        tracing::debug!("Merging {} updated packages", delta.packages.len());

        self.state.apply_delta(delta, now_millis());
        Ok(())
    }

    /// Write the snapshot file when enabled and something changed
    async fn persist(&mut self) -> Result<(), CacheError> {
        if !self.options.write_cache || !self.state.is_dirty() {
            tracing::debug!("Writing of cache skipped");
            return Ok(());
        }

        tracing::debug!("Writing local cache");
        SnapshotFile::new(&self.options.cache_path)
            .save(self.state.updated_at(), self.state.packages())
            .await
            .map_err(CacheError::Persistence)?;
        self.state.mark_written();
        Ok(())
    }

    fn keyword_filtered(&self, snapshot: Snapshot) -> Snapshot {
        Snapshot {
            updated: snapshot.updated,
            packages: filter_by_keywords(snapshot.packages, &self.options.keywords),
        }
    }
}
