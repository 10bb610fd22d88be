//! List Cache Module
//!
//! Preload-or-return cache of directory listings, invalidated wholesale.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::cache::{CacheKey, DatasetPath, DatasetStore, Workspace};
use crate::error::Result;

/// Outcome of a list preload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preloaded {
    /// Served from the cache without I/O
    Cached(Vec<String>),
    /// Fetched from the store and cached
    Fetched(Vec<String>),
}

impl Preloaded {
    pub fn is_cached(&self) -> bool {
        matches!(self, Preloaded::Cached(_))
    }

    pub fn into_names(self) -> Vec<String> {
        match self {
            Preloaded::Cached(names) | Preloaded::Fetched(names) => names,
        }
    }
}

// == List Cache ==
/// Listing results by cache key.
///
/// No per-key eviction and no TTL. In-flight fetches are not shared, so two
/// concurrent preloads of one key both reach the store.
#[derive(Debug, Default)]
pub struct ListCache {
    entries: Mutex<HashMap<CacheKey, Vec<String>>>,
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Vec<String>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Preload ==
    /// Returns the cached listing, or fetches it from `store` and caches it.
    ///
    /// A failed fetch caches nothing.
    pub async fn preload(
        &self,
        store: &dyn DatasetStore,
        workspace: &Workspace,
        path: &DatasetPath,
    ) -> Result<Preloaded> {
        let key = CacheKey::new(workspace, path);
        if let Some(names) = self.get(&key) {
            debug!("List cache hit for {}", key);
            return Ok(Preloaded::Cached(names));
        }

        let names = store.list(workspace, path).await?;
        debug!("Fetched listing for {} ({} names)", key, names.len());
        self.lock().insert(key, names.clone());
        Ok(Preloaded::Fetched(names))
    }

    /// Returns the cached listing for `key`, if present.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<String>> {
        self.lock().get(key).cloned()
    }

    // == Clear ==
    /// Drops every cached listing, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
