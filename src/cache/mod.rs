//! Cache Module
//!
//! Reactive dataset cache: synchronous reads of preloaded data, dependency
//! tracking, serialized writes and a listing cache.

mod codec;
mod entry;
mod key;
mod list;
mod memory;
mod reactive;
mod registry;
mod stats;
mod store;
mod tracker;


// Re-export public types
pub use codec::{Codec, JsonCodec};
pub use entry::CachedEntry;
pub use key::{CacheKey, DatasetPath, Workspace};
pub use list::{ListCache, Preloaded};
pub use memory::MemoryStore;
pub use reactive::ReactiveCache;
pub use registry::CacheRegistry;
pub use stats::{CacheStats, StatsRecorder};
pub use store::DatasetStore;
pub use tracker::{DependencyTracker, TrackingScope, TrackingSet};

// == Public Constants ==
/// Maximum allowed workspace length in bytes
pub const MAX_WORKSPACE_LENGTH: usize = 128;

/// Maximum allowed path segment length in bytes
pub const MAX_SEGMENT_LENGTH: usize = 255;

/// Default maximum number of segments in a dataset path
pub const DEFAULT_MAX_PATH_DEPTH: usize = 64;
