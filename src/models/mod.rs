//! Request and Response models for the dataset cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{DatasetTarget, WriteQuery};
pub use responses::{
    ClearResponse, ErrorResponse, HealthResponse, ListResponse, ReadResponse, StatsResponse,
    WriteResponse,
};
