//! Data models
//!
//! Shared between bookstore-server and API clients.
//! All IDs are `i64`, assigned by the owning store.
//! Timestamps are `DateTime<Utc>` serialized as RFC 3339.

pub mod author;
pub mod book;
pub mod customer;
pub mod order;
pub mod report;
pub mod search;
pub mod user;

// Re-exports
pub use author::*;
pub use book::*;
pub use customer::*;
pub use order::*;
pub use report::*;
pub use search::*;
pub use user::*;
