//! Reactive Cache Module
//!
//! The cache context a render layer talks to: owns the store registry, the
//! dependency tracker, the list cache and the write queue.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::{
    CacheKey, CacheRegistry, CacheStats, Codec, DatasetPath, DatasetStore, DependencyTracker,
    JsonCodec, ListCache, StatsRecorder, TrackingScope, TrackingSet, Workspace,
};
use crate::error::{CacheError, Result};
use crate::tasks::{WriteHandle, WriteQueue};

// == Reactive Cache ==
/// Mediation layer between synchronous render passes and a dataset store.
///
/// A render pass either enables the ambient tracking window or opens a
/// `TrackingScope`, performs synchronous reads of preloaded data, and collects
/// the keys it depended on. Writes are encoded immediately and executed later,
/// one at a time, by the write queue.
pub struct ReactiveCache<C: Codec = JsonCodec> {
    registry: Arc<CacheRegistry>,
    tracker: DependencyTracker,
    lists: ListCache,
    writes: WriteQueue,
    stats: Arc<StatsRecorder>,
    codec: C,
}

impl ReactiveCache<JsonCodec> {
    // == Constructors ==
    /// Creates an uninitialized cache using the JSON codec.
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }

    /// Creates a cache already bound to `store`.
    pub fn with_store(store: Arc<dyn DatasetStore>) -> Self {
        let cache = Self::new();
        cache.init(store);
        cache
    }
}

impl Default for ReactiveCache<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> ReactiveCache<C> {
    /// Creates an uninitialized cache using `codec`.
    pub fn with_codec(codec: C) -> Self {
        let stats = Arc::new(StatsRecorder::new());
        Self {
            registry: Arc::new(CacheRegistry::new()),
            tracker: DependencyTracker::new(),
            lists: ListCache::new(),
            writes: WriteQueue::new(Arc::clone(&stats)),
            stats,
            codec,
        }
    }

    // == Registry ==
    /// Binds the cache to `store`, replacing any previous store.
    pub fn init(&self, store: Arc<dyn DatasetStore>) {
        self.registry.init(store);
    }

    /// Returns the bound store, or `NotInitialized`.
    pub fn get(&self) -> Result<Arc<dyn DatasetStore>> {
        self.registry.get()
    }

    /// Unbinds the store. Queued writes and cached listings are kept.
    pub fn clear(&self) {
        self.registry.clear();
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_initialized()
    }

    // == Tracking ==
    /// Opens the ambient tracking window.
    pub fn enable_tracking(&self) -> TrackingSet {
        self.tracker.enable()
    }

    /// Closes the ambient tracking window and returns the keys it collected.
    pub fn disable_tracking(&self) -> Vec<CacheKey> {
        self.tracker.disable()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }

    /// Records an access in the ambient window.
    pub fn track(&self, workspace: &Workspace, path: &DatasetPath) {
        self.tracker.track(&CacheKey::new(workspace, path));
    }

    /// Opens an explicit tracking scope for `read_in` and `list_in`.
    pub fn scope(&self) -> TrackingScope {
        TrackingScope::new()
    }

    // == Read ==
    /// Reads and decodes a preloaded dataset, tracking the access in the
    /// ambient window.
    ///
    /// The access is tracked even when the read fails, so a pass that hits an
    /// unloaded path still depends on it.
    ///
    /// # Errors
    /// - `NotInitialized` if no store is bound
    /// - `NotLoaded` if the path was not preloaded
    /// - `Decode` if the payload is not a `T`
    pub fn read<T: DeserializeOwned>(
        &self,
        workspace: &Workspace,
        path: &DatasetPath,
    ) -> Result<T> {
        let key = CacheKey::new(workspace, path);
        self.tracker.track(&key);
        self.read_key(key, workspace, path)
    }

    /// Like `read`, but records the access in `scope` only.
    pub fn read_in<T: DeserializeOwned>(
        &self,
        scope: &TrackingScope,
        workspace: &Workspace,
        path: &DatasetPath,
    ) -> Result<T> {
        let key = CacheKey::new(workspace, path);
        scope.record(&key);
        self.read_key(key, workspace, path)
    }

    fn read_key<T: DeserializeOwned>(
        &self,
        key: CacheKey,
        workspace: &Workspace,
        path: &DatasetPath,
    ) -> Result<T> {
        let store = self.registry.get()?;
        let Some(bytes) = store.read(workspace, path) else {
            self.stats.record_read_miss();
            return Err(CacheError::NotLoaded(key.into()));
        };
        self.stats.record_read_hit();

        self.codec.decode(&bytes).map_err(|err| CacheError::Decode {
            key: key.into(),
            reason: err.to_string(),
        })
    }

    /// Returns true if the store holds the path. Not tracked.
    pub fn has(&self, workspace: &Workspace, path: &DatasetPath) -> Result<bool> {
        Ok(self.registry.get()?.has(workspace, path))
    }

    // == Write ==
    /// Encodes `value` now and queues the store write.
    ///
    /// Returns as soon as the write is queued. The store is resolved when the
    /// write runs, not when it is queued. Drop the handle to ignore the
    /// outcome, or `wait` on it to observe completion.
    ///
    /// # Errors
    /// - `NotInitialized` if no store is bound at call time
    /// - `Encode` if the value cannot be encoded
    /// - `NoRuntime` if the write queue has no live drain loop and the caller
    ///   is outside a Tokio runtime
    pub fn write<T: Serialize + ?Sized>(
        &self,
        workspace: &Workspace,
        path: &DatasetPath,
        value: &T,
    ) -> Result<WriteHandle> {
        let key = CacheKey::new(workspace, path);
        self.registry.get()?;

        let bytes = self.codec.encode(value).map_err(|err| CacheError::Encode {
            key: key.to_string(),
            reason: err.to_string(),
        })?;

        let registry = Arc::clone(&self.registry);
        let workspace = workspace.clone();
        let path = path.clone();
        debug!("Queued write of {} bytes to {}", bytes.len(), key);

        self.writes.enqueue(key, async move {
            let store = registry.get()?;
            store.write(&workspace, &path, bytes).await
        })
    }

    /// Waits until every write queued so far has finished.
    pub async fn flush(&self) {
        self.writes.flush().await;
    }

    pub fn pending_writes(&self) -> u64 {
        self.writes.pending()
    }

    // == Lists ==
    /// Returns the cached listing of `path`, fetching it from the store on
    /// first use.
    pub async fn preload_list(
        &self,
        workspace: &Workspace,
        path: &DatasetPath,
    ) -> Result<Vec<String>> {
        let store = self.registry.get()?;
        let preloaded = self.lists.preload(store.as_ref(), workspace, path).await?;

        if preloaded.is_cached() {
            self.stats.record_list_hit();
        } else {
            self.stats.record_list_miss();
        }
        Ok(preloaded.into_names())
    }

    /// Returns a preloaded listing, tracking the access in the ambient window.
    ///
    /// # Errors
    /// - `NotLoaded` if `preload_list` has not cached this path
    pub fn list(&self, workspace: &Workspace, path: &DatasetPath) -> Result<Vec<String>> {
        let key = CacheKey::new(workspace, path);
        self.tracker.track(&key);
        self.cached_list(key)
    }

    /// Like `list`, but records the access in `scope` only.
    pub fn list_in(
        &self,
        scope: &TrackingScope,
        workspace: &Workspace,
        path: &DatasetPath,
    ) -> Result<Vec<String>> {
        let key = CacheKey::new(workspace, path);
        scope.record(&key);
        self.cached_list(key)
    }

    fn cached_list(&self, key: CacheKey) -> Result<Vec<String>> {
        self.lists
            .get(&key)
            .ok_or_else(|| CacheError::NotLoaded(key.into()))
    }

    /// Drops every cached listing, returning how many were removed.
    pub fn clear_list_cache(&self) -> usize {
        let removed = self.lists.clear();
        debug!("List cache cleared ({} entries)", removed);
        removed
    }

    // == Refetch ==
    /// Asks the store to refresh the path every `interval`.
    pub fn set_refetch_interval(
        &self,
        workspace: &Workspace,
        path: &DatasetPath,
        interval: Duration,
    ) -> Result<()> {
        self.registry
            .get()?
            .set_refetch_interval(workspace, path, interval);
        Ok(())
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.lists.len())
    }
}
