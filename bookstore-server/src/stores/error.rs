//! Store error types

use thiserror::Error;

use super::snapshot::SnapshotError;

/// Errors returned by every store operation
///
/// `Persistence` is distinct from the other variants: the in-memory change
/// has already committed when it is reported, only the snapshot write failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("book {0} does not exist")]
    BookMissing(i64),

    #[error("author {0} does not exist")]
    AuthorMissing(i64),

    #[error("author {author_id} is referenced by {books} book(s)")]
    AuthorHasBooks { author_id: i64, books: usize },

    #[error("insufficient stock for book {book_id}: requested {requested}, available {available}")]
    InsufficientStock {
        book_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("change committed but snapshot failed: {0}")]
    Persistence(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl From<SnapshotError> for StoreError {
    fn from(err: SnapshotError) -> Self {
        StoreError::Persistence(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
