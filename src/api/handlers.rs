//! API Handlers
//!
//! HTTP request handlers exposing a reactive cache instance.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheKey, MemoryStore, ReactiveCache, DEFAULT_MAX_PATH_DEPTH};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ClearResponse, DatasetTarget, HealthResponse, ListResponse, ReadResponse, StatsResponse,
    WriteQuery, WriteResponse,
};

/// Application state shared across all handlers.
///
/// Contains the reactive cache wrapped in Arc for shared access.
#[derive(Clone)]
pub struct AppState {
    /// Shared reactive cache
    pub cache: Arc<ReactiveCache>,
    /// Maximum accepted dataset path depth
    pub max_path_depth: usize,
    /// Refetch interval applied to preloaded listings
    pub refetch_interval: Option<Duration>,
}

impl AppState {
    /// Creates a new AppState around the given cache with default limits.
    pub fn new(cache: ReactiveCache) -> Self {
        Self {
            cache: Arc::new(cache),
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            refetch_interval: None,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Binds the cache to an in-memory dataset store.
    pub fn from_config(config: &Config) -> Self {
        let cache = ReactiveCache::with_store(Arc::new(MemoryStore::new()));
        Self {
            cache: Arc::new(cache),
            max_path_depth: config.max_path_depth,
            refetch_interval: config.refetch_interval(),
        }
    }
}

/// Handler for GET /datasets/:workspace/*path
///
/// Reads a preloaded dataset as JSON.
pub async fn read_handler(
    State(state): State<AppState>,
    Path(target): Path<DatasetTarget>,
) -> Result<Json<ReadResponse>> {
    let (workspace, path) = target.resolve(state.max_path_depth)?;
    let value: Value = state.cache.read(&workspace, &path)?;

    Ok(Json(ReadResponse::new(
        CacheKey::new(&workspace, &path),
        value,
    )))
}

/// Handler for PUT /datasets/:workspace/*path
///
/// Queues a write of the JSON body. With `?wait=true` the response is sent
/// after the write finished.
pub async fn write_handler(
    State(state): State<AppState>,
    Path(target): Path<DatasetTarget>,
    Query(query): Query<WriteQuery>,
    Json(value): Json<Value>,
) -> Result<Json<WriteResponse>> {
    let (workspace, path) = target.resolve(state.max_path_depth)?;
    let handle = state.cache.write(&workspace, &path, &value)?;
    let key = handle.key().to_string();

    if query.wait {
        handle.wait().await?;
    }

    Ok(Json(WriteResponse::new(key, query.wait)))
}

/// Handler for POST /lists/:workspace/*path
///
/// Preloads the listing of a path, applying the configured refetch interval.
pub async fn preload_list_handler(
    State(state): State<AppState>,
    Path(target): Path<DatasetTarget>,
) -> Result<Json<ListResponse>> {
    let (workspace, path) = target.resolve(state.max_path_depth)?;
    let names = state.cache.preload_list(&workspace, &path).await?;

    if let Some(interval) = state.refetch_interval {
        state.cache.set_refetch_interval(&workspace, &path, interval)?;
    }

    Ok(Json(ListResponse::new(
        CacheKey::new(&workspace, &path),
        names,
    )))
}

/// Handler for GET /lists/:workspace/*path
///
/// Returns a listing that was preloaded before.
pub async fn list_handler(
    State(state): State<AppState>,
    Path(target): Path<DatasetTarget>,
) -> Result<Json<ListResponse>> {
    let (workspace, path) = target.resolve(state.max_path_depth)?;
    let names = state.cache.list(&workspace, &path)?;

    Ok(Json(ListResponse::new(
        CacheKey::new(&workspace, &path),
        names,
    )))
}

/// Handler for DELETE /lists
///
/// Drops every cached listing.
pub async fn clear_lists_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.cache.clear_list_cache();
    debug!("Cleared list cache via API");
    Json(ClearResponse::new(cleared))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.is_initialized()))
}
