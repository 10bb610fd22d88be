//! Cache Registry Module
//!
//! Holds the live dataset store instance for a cache context.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::cache::DatasetStore;
use crate::error::{CacheError, Result};

// == Cache Registry ==
/// Single optional reference to the active store.
///
/// Every operation resolves the store at the moment it runs, so an `init`
/// between enqueueing and executing a write changes its target.
#[derive(Default)]
pub struct CacheRegistry {
    store: RwLock<Option<Arc<dyn DatasetStore>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Init ==
    /// Registers `store`, replacing any previous instance.
    pub fn init(&self, store: Arc<dyn DatasetStore>) {
        let previous = self
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(store);

        if previous.is_some() {
            debug!("Dataset store replaced");
        } else {
            info!("Dataset store initialized");
        }
    }

    // == Get ==
    /// Returns the active store, or `NotInitialized`.
    pub fn get(&self) -> Result<Arc<dyn DatasetStore>> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(CacheError::NotInitialized)
    }

    // == Clear ==
    /// Drops the active store reference.
    pub fn clear(&self) {
        if self
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            info!("Dataset store cleared");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
