//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_MAX_PATH_DEPTH;

/// Dataset cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port for the dev surface
    pub server_port: u16,
    /// Maximum number of segments accepted in a dataset path
    pub max_path_depth: usize,
    /// Refetch interval in milliseconds applied to preloaded listings (0 = none)
    pub default_refetch_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_PATH_DEPTH` - Maximum dataset path segments (default: 64)
    /// - `DEFAULT_REFETCH_INTERVAL_MS` - Listing refetch interval (default: 0, disabled)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            max_path_depth: env::var("MAX_PATH_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|depth: &usize| *depth > 0)
                .unwrap_or(DEFAULT_MAX_PATH_DEPTH),
            default_refetch_interval_ms: env::var("DEFAULT_REFETCH_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Returns the configured refetch interval, or None when disabled.
    pub fn refetch_interval(&self) -> Option<Duration> {
        match self.default_refetch_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            default_refetch_interval_ms: 0,
        }
    }
}
