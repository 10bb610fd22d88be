//! Request DTOs for the dataset cache API
//!
//! Defines the structure of incoming path parameters and query strings.

use serde::Deserialize;

use crate::cache::{DatasetPath, Workspace};
use crate::error::Result;

/// Raw `(workspace, path)` pair taken from the request URL.
///
/// # Fields
/// - `workspace`: The workspace identifier
/// - `path`: `/`-separated dataset path, empty for the workspace root
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetTarget {
    /// The workspace identifier
    pub workspace: String,
    /// The dataset path
    #[serde(default)]
    pub path: String,
}

impl DatasetTarget {
    /// Validates the raw parameters into typed values.
    ///
    /// Returns `InvalidPath` if either part is malformed or the path is deeper
    /// than `max_depth`.
    pub fn resolve(&self, max_depth: usize) -> Result<(Workspace, DatasetPath)> {
        let workspace = Workspace::new(self.workspace.as_str())?;
        let path = DatasetPath::parse_with_depth(&self.path, max_depth)?;
        Ok((workspace, path))
    }
}

/// Query string of the write endpoint (PUT /datasets/:workspace/*path)
///
/// # Fields
/// - `wait`: Await the queued write before responding
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteQuery {
    /// Await the write before responding
    #[serde(default)]
    pub wait: bool,
}
