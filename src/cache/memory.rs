//! Memory Store Module
//!
//! In-process `DatasetStore` backed by an ordered map, used by the dev server
//! and tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{CacheKey, CachedEntry, DatasetPath, DatasetStore, Workspace};
use crate::error::Result;

// == Memory Store ==
/// Dataset store holding every payload in memory.
///
/// Entries are ordered by `(workspace, path)` so that all descendants of a
/// path form one contiguous range, which is what `list` walks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Encoded payloads by location
    entries: RwLock<BTreeMap<(Workspace, DatasetPath), CachedEntry>>,
    /// Requested refetch intervals by key
    refetch_intervals: RwLock<HashMap<CacheKey, Duration>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Stores a payload synchronously, replacing any previous one.
    pub fn insert(&self, workspace: &Workspace, path: &DatasetPath, payload: Vec<u8>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((workspace.clone(), path.clone()), CachedEntry::new(payload));
    }

    /// Returns the stored entry with its metadata.
    pub fn entry(&self, workspace: &Workspace, path: &DatasetPath) -> Option<CachedEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(workspace.clone(), path.clone()))
            .cloned()
    }

    /// Returns the refetch interval last requested for the path.
    pub fn refetch_interval(&self, workspace: &Workspace, path: &DatasetPath) -> Option<Duration> {
        self.refetch_intervals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&CacheKey::new(workspace, path))
            .copied()
    }

    // == Length ==
    /// Returns the number of stored payloads.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DatasetStore for MemoryStore {
    fn has(&self, workspace: &Workspace, path: &DatasetPath) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&(workspace.clone(), path.clone()))
    }

    fn read(&self, workspace: &Workspace, path: &DatasetPath) -> Option<Vec<u8>> {
        self.entry(workspace, path).map(|entry| entry.payload)
    }

    async fn write(
        &self,
        workspace: &Workspace,
        path: &DatasetPath,
        bytes: Vec<u8>,
    ) -> Result<()> {
        self.insert(workspace, path, bytes);
        Ok(())
    }

    async fn list(&self, workspace: &Workspace, path: &DatasetPath) -> Result<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let start = (workspace.clone(), path.clone());

        // Descendants of `path` sort directly after it.
        let names: BTreeSet<String> = entries
            .range(start..)
            .take_while(|((ws, p), _)| ws == workspace && (p == path || path.is_ancestor_of(p)))
            .filter_map(|((_, p), _)| p.segments().get(path.depth()).cloned())
            .collect();

        Ok(names.into_iter().collect())
    }

    fn set_refetch_interval(&self, workspace: &Workspace, path: &DatasetPath, interval: Duration) {
        let key = CacheKey::new(workspace, path);
        debug!("Refetch interval for {} set to {:?}", key, interval);
        self.refetch_intervals
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, interval);
    }
}
