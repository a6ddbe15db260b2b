//! Shared types for the bookstore backend
//!
//! Common types used by the server and its clients: the unified error
//! system and the entity models exchanged over the REST API.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
