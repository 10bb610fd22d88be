//! Response DTOs for the dataset cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for a dataset read (GET /datasets/:workspace/*path)
#[derive(Debug, Clone, Serialize)]
pub struct ReadResponse {
    /// Cache key of the dataset
    pub key: String,
    /// The decoded value
    pub value: Value,
}

impl ReadResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for a dataset write (PUT /datasets/:workspace/*path)
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// Success message
    pub message: String,
    /// Cache key of the dataset
    pub key: String,
    /// Whether the write had finished when the response was sent
    pub completed: bool,
}

impl WriteResponse {
    pub fn new(key: impl Into<String>, completed: bool) -> Self {
        let key = key.into();
        let message = if completed {
            format!("Dataset '{}' written", key)
        } else {
            format!("Write to '{}' queued", key)
        };
        Self {
            message,
            key,
            completed,
        }
    }
}

/// Response body for listing endpoints (GET/POST /lists/:workspace/*path)
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    /// Cache key of the listed path
    pub key: String,
    /// Names of the direct children
    pub names: Vec<String>,
}

impl ListResponse {
    pub fn new(key: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            key: key.into(),
            names,
        }
    }
}

/// Response body for clearing the list cache (DELETE /lists)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of cached listings removed
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached listings", cleared),
            cleared,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Operation counters
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Writes queued but not yet finished
    pub pending_writes: u64,
    /// Read hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// List preload hit rate
    pub list_hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            pending_writes: stats.pending_writes(),
            hit_rate: stats.hit_rate(),
            list_hit_rate: stats.list_hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether a dataset store is bound
    pub initialized: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(initialized: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            initialized,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
