//! Cached Entry Module
//!
//! Defines the structure for encoded dataset payloads held by a store.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cached Entry ==
/// An opaque encoded payload with write metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    /// Encoded bytes, as produced by a codec
    pub payload: Vec<u8>,
    /// Write timestamp (Unix milliseconds)
    pub written_at: u64,
}

impl CachedEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            written_at: current_timestamp_ms(),
        }
    }

    /// Returns the payload size in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
