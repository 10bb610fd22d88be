//! Dependency Tracker Module
//!
//! Records which cache keys a render pass touched, either through the ambient
//! tracking window or through an explicit `TrackingScope`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::cache::CacheKey;

#[derive(Debug, Default)]
struct TrackedKeys {
    /// Keys in first-access order
    order: Vec<CacheKey>,
    seen: HashSet<CacheKey>,
}

// == Tracking Set ==
/// Deduplicated, insertion-ordered set of keys accessed during one window.
///
/// Cloning yields another handle to the same set.
#[derive(Debug, Clone, Default)]
pub struct TrackingSet {
    inner: Arc<Mutex<TrackedKeys>>,
}

impl TrackingSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackedKeys> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `key`, returning false if it was already present.
    pub fn insert(&self, key: CacheKey) -> bool {
        let mut keys = self.lock();
        if keys.seen.insert(key.clone()) {
            keys.order.push(key);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the keys in first-access order.
    pub fn snapshot(&self) -> Vec<CacheKey> {
        self.lock().order.clone()
    }
}

// == Dependency Tracker ==
/// The ambient tracking window of a cache context.
///
/// There is at most one active window. Nested windows are not supported:
/// enabling again replaces the set, and every tracked access lands in whichever
/// set is current.
#[derive(Debug, Default)]
pub struct DependencyTracker {
    active: Mutex<Option<TrackingSet>>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<TrackingSet>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Enable ==
    /// Starts a new empty window and returns a handle to its set.
    pub fn enable(&self) -> TrackingSet {
        let set = TrackingSet::new();
        if self.lock().replace(set.clone()).is_some() {
            debug!("Tracking window replaced while still active");
        }
        set
    }

    // == Disable ==
    /// Ends the window, returning its keys. Empty when no window was active.
    pub fn disable(&self) -> Vec<CacheKey> {
        self.lock()
            .take()
            .map(|set| set.snapshot())
            .unwrap_or_default()
    }

    pub fn is_tracking(&self) -> bool {
        self.lock().is_some()
    }

    // == Track ==
    /// Records `key` in the active window. No-op when inactive.
    pub fn track(&self, key: &CacheKey) {
        if let Some(set) = self.lock().as_ref() {
            set.insert(key.clone());
        }
    }
}

// == Tracking Scope ==
/// An explicit tracking handle, independent of the ambient window.
///
/// Pass it to `ReactiveCache::read_in` or `list_in`, then call `finish` to
/// collect the dependencies. Scopes never share state, so they nest.
#[derive(Debug, Clone, Default)]
pub struct TrackingScope {
    set: TrackingSet,
}

impl TrackingScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, key: &CacheKey) {
        self.set.insert(key.clone());
    }

    /// Closes the scope and returns the keys in first-access order.
    pub fn finish(self) -> Vec<CacheKey> {
        self.set.snapshot()
    }
}
