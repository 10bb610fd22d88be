//! API Module
//!
//! HTTP handlers and routing that expose a reactive cache instance to
//! preload helpers and tooling.
//!
//! # Endpoints
//! - `GET|PUT /datasets/:workspace/*path` - Read or write a dataset
//! - `GET|POST /lists/:workspace/*path` - Read or preload a listing
//! - `DELETE /lists` - Clear the list cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
