//! Error types for the dataset cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the dataset cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No store registered with the cache
    #[error(
        "Dataset cache is not initialized: call `ReactiveCache::init(store)` before use, \
         or build the cache with the provider constructor `ReactiveCache::with_store(store)`"
    )]
    NotInitialized,

    /// Synchronous access to a key that was never preloaded
    #[error("Dataset '{0}' is not loaded: preload this path before rendering")]
    NotLoaded(String),

    /// Workspace or dataset path rejected at the input boundary
    #[error("Invalid dataset path: {0}")]
    InvalidPath(String),

    /// Value could not be encoded for a write
    #[error("Failed to encode value for '{key}': {reason}")]
    Encode { key: String, reason: String },

    /// Stored bytes could not be decoded as the requested type
    #[error("Failed to decode dataset '{key}': {reason}")]
    Decode { key: String, reason: String },

    /// Failure reported by the underlying dataset store
    #[error("Store error: {0}")]
    Store(String),

    /// Write task finished without reporting a result
    #[error("Write to '{0}' was aborted before completing")]
    WriteAborted(String),

    /// Write queue needed a Tokio runtime and none was entered
    #[error("No Tokio runtime is available to run queued writes")]
    NoRuntime,
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotLoaded(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidPath(_) | CacheError::Encode { .. } => StatusCode::BAD_REQUEST,
            CacheError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Decode { .. }
            | CacheError::Store(_)
            | CacheError::WriteAborted(_)
            | CacheError::NoRuntime => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the dataset cache.
pub type Result<T> = std::result::Result<T, CacheError>;
