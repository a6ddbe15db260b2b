//! Book Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Book entity
///
/// `stock` is only moved by order operations once the book exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    /// Author reference (weak, lookup only)
    pub author_id: i64,
    pub genres: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub price: f64,
    /// Units available for new orders, never negative
    pub stock: i64,
}

/// Create / replace book payload
///
/// PUT uses the same payload: updates replace the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPayload {
    pub title: String,
    pub author_id: i64,
    #[serde(default)]
    pub genres: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
}

impl BookPayload {
    /// Build the record stored under `id`
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author_id: self.author_id,
            genres: self.genres,
            published_at: self.published_at,
            price: self.price,
            stock: self.stock,
        }
    }
}
