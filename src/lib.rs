//! Dataset Cache - A reactive in-memory cache for hierarchical datasets
//!
//! Provides synchronous reads of preloaded data, dependency tracking for
//! render passes, a serialized write queue and a listing cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheKey, DatasetPath, DatasetStore, MemoryStore, ReactiveCache, Workspace};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::WriteHandle;
