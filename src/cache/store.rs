//! Dataset Store Module
//!
//! The interface to the underlying per-key store the reactive cache reads
//! and writes through.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{DatasetPath, Workspace};
use crate::error::Result;

// == Dataset Store ==
/// Underlying store holding encoded dataset payloads.
///
/// Reads are synchronous and only consult what the store already holds;
/// writes and listings may suspend on I/O. Implementations must be safe to
/// share across tasks.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Returns true if a payload for the path is held locally.
    fn has(&self, workspace: &Workspace, path: &DatasetPath) -> bool;

    /// Returns the locally held payload for the path, if any.
    fn read(&self, workspace: &Workspace, path: &DatasetPath) -> Option<Vec<u8>>;

    /// Persists an encoded payload for the path.
    async fn write(&self, workspace: &Workspace, path: &DatasetPath, bytes: Vec<u8>)
        -> Result<()>;

    /// Fetches the names of the direct children of the path.
    async fn list(&self, workspace: &Workspace, path: &DatasetPath) -> Result<Vec<String>>;

    /// Asks the store to refresh the path periodically.
    fn set_refetch_interval(&self, workspace: &Workspace, path: &DatasetPath, interval: Duration);
}
