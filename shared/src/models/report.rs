//! Sales Report Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quantity sold for one book within a report window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSales {
    pub book_id: i64,
    /// Resolved at generation time; empty if the book was deleted since
    #[serde(default)]
    pub title: String,
    pub quantity: i64,
}

/// Sales report over `[window_start, window_end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_revenue: f64,
    pub total_orders: i64,
    /// Top books by quantity, ties broken by book id
    pub top_selling_books: Vec<BookSales>,
}
