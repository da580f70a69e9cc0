//! Shared types for the storefront API
//!
//! Wire-level models and request/response DTOs. These are the JSON shapes
//! the SPA consumes; the server converts its database models into these at
//! the handler boundary.

pub mod client;
pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};
