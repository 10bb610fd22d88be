//! API Routes
//!
//! Configures the Axum router with all dataset cache endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_lists_handler, health_handler, list_handler, preload_list_handler, read_handler,
    stats_handler, write_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /datasets/:workspace/*path` - Read a preloaded dataset
/// - `PUT /datasets/:workspace/*path` - Queue a dataset write (`?wait=true` to await it)
/// - `POST /lists/:workspace[/*path]` - Preload a listing
/// - `GET /lists/:workspace[/*path]` - Return a preloaded listing
/// - `DELETE /lists` - Clear the list cache
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(
            "/datasets/:workspace/*path",
            get(read_handler).put(write_handler),
        )
        .route(
            "/lists/:workspace",
            get(list_handler).post(preload_list_handler),
        )
        .route(
            "/lists/:workspace/*path",
            get(list_handler).post(preload_list_handler),
        )
        .route("/lists", delete(clear_lists_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
