//! Background Tasks Module
//!
//! Contains the background work that runs alongside the cache.
//!
//! # Tasks
//! - Write queue drain loop: runs queued dataset writes one at a time

mod write_queue;

pub use write_queue::{WriteHandle, WriteQueue};
