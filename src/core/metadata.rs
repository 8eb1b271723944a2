//! Cache state and metadata tracking
//!
//! [`CacheState`] holds everything a cache instance knows: its package set,
//! when that set was last known good, and whether it needs refreshing or
//! writing. All transitions happen here; the lifecycle manager in
//! [`crate::core::cache`] only sequences them around I/O.

use serde::Serialize;

use crate::core::package::{PackageSet, Snapshot};

/// Observable lifecycle of a cache instance
///
/// `Empty -> Loading -> Loaded`, `Loaded -> Stale` once the TTL has passed,
/// and a refresh takes `Loaded | Stale` back to `Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Empty,
    Loading,
    Loaded,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Empty,
    Loading,
    Loaded,
}

/// Input to [`CacheState::update_metadata`]
#[derive(Debug)]
pub enum MetadataSource {
    /// Modification time of a snapshot file, epoch millis
    FileModified(i64),
    /// A freshly read or fetched snapshot
    Snapshot(Snapshot),
}

/// Mutable state of one cache instance
#[derive(Debug, Clone)]
pub struct CacheState {
    phase: Phase,
    stale: bool,
    updated_at: Option<i64>,
    packages: PackageSet,
    dirty: bool,
    last_result: Option<PackageSet>,
}

impl CacheState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Empty,
            stale: false,
            updated_at: None,
            packages: PackageSet::new(),
            dirty: false,
            last_result: None,
        }
    }

    /// Return every field to its initial value
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn status(&self) -> CacheStatus {
        match self.phase {
            Phase::Empty => CacheStatus::Empty,
            Phase::Loading => CacheStatus::Loading,
            Phase::Loaded if self.stale => CacheStatus::Stale,
            Phase::Loaded => CacheStatus::Loaded,
        }
    }

    /// True once any source populated the package set
    pub fn is_loaded(&self) -> bool {
        self.phase == Phase::Loaded
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last known good timestamp, epoch millis
    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    pub fn packages(&self) -> &PackageSet {
        &self.packages
    }

    pub fn last_result(&self) -> Option<&PackageSet> {
        self.last_result.as_ref()
    }

    /// Enter `Loading` unless already loaded
    pub fn begin_loading(&mut self) {
        if self.phase != Phase::Loaded {
            self.phase = Phase::Loading;
        }
    }

    /// Leave `Loading` after a failed load
    pub fn abort_loading(&mut self) {
        if self.phase == Phase::Loading {
            self.phase = Phase::Empty;
        }
    }

    /// Force the next delta refresh to run
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// The package set differs from what is on disk
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The package set was written successfully
    pub fn mark_written(&mut self) {
        self.dirty = false;
    }

    pub fn set_last_result(&mut self, result: PackageSet) {
        self.last_result = Some(result);
    }

    /// Update timestamps (and possibly packages) from a source, then
    /// re-check staleness
    ///
    /// A file modification time only moves `updated_at`. A snapshot moves
    /// `updated_at` to its `_updated` marker (or `now` without one), becomes
    /// the package set and marks the cache loaded. The cache turns stale and
    /// dirty when `updated_at` is older than `now - ttl_millis`; this check
    /// never clears staleness.
    pub fn update_metadata(&mut self, source: MetadataSource, ttl_millis: i64, now: i64) {
        match source {
            MetadataSource::FileModified(modified) => {
                self.updated_at = Some(modified);
            }
            MetadataSource::Snapshot(snapshot) => {
                self.updated_at = Some(snapshot.updated.unwrap_or(now));
                self.packages = snapshot.packages;
                self.phase = Phase::Loaded;
            }
        }

        if self.is_expired(ttl_millis, now) {
            self.stale = true;
            self.dirty = true;
        }
    }

    /// Merge a (keyword-filtered) delta into the package set
    ///
    /// Entries are replaced wholesale by name, never deep-merged. Afterwards
    /// the cache is loaded, fresh as of the delta's marker, and dirty.
    pub fn apply_delta(&mut self, delta: Snapshot, now: i64) {
        if self.packages.is_empty() {
            self.packages = delta.packages;
        } else {
            for (name, record) in delta.packages {
                self.packages.insert(name, record);
            }
        }

        self.updated_at = Some(delta.updated.unwrap_or(now));
        self.stale = false;
        self.dirty = true;
        self.phase = Phase::Loaded;
    }

    fn is_expired(&self, ttl_millis: i64, now: i64) -> bool {
        self.updated_at
            .is_some_and(|updated| updated < now.saturating_sub(ttl_millis))
    }
}

impl Default for CacheState {
    fn default() -> Self {
        Self::new()
    }
}
