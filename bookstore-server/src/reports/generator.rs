//! Sales report aggregation
//!
//! Reads orders first, then resolves titles book by book. Only one store
//! lock is held at any time, so it never contends with the order → book
//! lock order used by order mutations.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use shared::models::{BookSales, SalesReport};
use tokio_util::sync::CancellationToken;

use crate::stores::{BookStore, OrderStore, StoreError, StoreResult};

/// Maximum number of books in `top_selling_books`
pub const TOP_SELLING_LIMIT: usize = 10;

/// Build a report over `[now - window, now)`
pub fn generate_report(
    orders: &OrderStore,
    books: &BookStore,
    window: Duration,
    cancel: &CancellationToken,
) -> StoreResult<SalesReport> {
    let now = Utc::now();
    generate_report_between(orders, books, now - window, now, cancel)
}

/// Build a report over `[start, end)`
pub fn generate_report_between(
    orders: &OrderStore,
    books: &BookStore,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    cancel: &CancellationToken,
) -> StoreResult<SalesReport> {
    let window_orders = orders.in_time_range(start, end, cancel)?;

    let total_revenue: f64 = window_orders.iter().map(|o| o.total_price).sum();
    let mut quantities: HashMap<i64, i64> = HashMap::new();
    for order in &window_orders {
        for item in &order.items {
            *quantities.entry(item.book_id).or_insert(0) += item.quantity;
        }
    }

    let mut ranked: Vec<(i64, i64)> = quantities.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(TOP_SELLING_LIMIT);

    let mut top_selling_books = Vec::with_capacity(ranked.len());
    for (book_id, quantity) in ranked {
        let title = match books.get(book_id, cancel) {
            Ok(book) => book.title,
            Err(StoreError::NotFound { .. }) => String::new(),
            Err(e) => return Err(e),
        };
        top_selling_books.push(BookSales {
            book_id,
            title,
            quantity,
        });
    }

    Ok(SalesReport {
        timestamp: Utc::now(),
        window_start: start,
        window_end: end,
        total_revenue,
        total_orders: window_orders.len() as i64,
        top_selling_books,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemorySnapshot;
    use shared::models::{Book, Order, OrderItem, OrderStatus};
    use std::sync::Arc;

    fn book(title: &str, stock: i64) -> Book {
        Book {
            id: 0,
            title: title.into(),
            author_id: 1,
            genres: vec!["fiction".into()],
            published_at: Utc::now(),
            price: 10.0,
            stock,
        }
    }

    fn order(items: &[(i64, i64)], total_price: f64) -> Order {
        Order {
            id: 0,
            customer_id: 1,
            items: items
                .iter()
                .map(|&(book_id, quantity)| OrderItem { book_id, quantity })
                .collect(),
            total_price,
            created_at: Utc::now(),
            status: OrderStatus::Pending,
        }
    }

    fn stores() -> (Arc<BookStore>, OrderStore) {
        let books = Arc::new(BookStore::new(Arc::new(MemorySnapshot::<Book>::new())));
        let orders = OrderStore::new(Arc::new(MemorySnapshot::<Order>::new()), books.clone());
        (books, orders)
    }

    #[test]
    fn test_totals_and_ranking() {
        let cancel = CancellationToken::new();
        let (books, orders) = stores();
        for title in ["A", "B", "C"] {
            books.create(book(title, 100), &cancel).unwrap();
        }

        orders.create(order(&[(1, 2), (2, 5)], 70.0), &cancel).unwrap();
        orders.create(order(&[(3, 5)], 50.0), &cancel).unwrap();
        orders.create(order(&[(1, 1)], 10.0), &cancel).unwrap();

        let report = generate_report(&orders, &books, Duration::hours(1), &cancel).unwrap();
        assert_eq!(report.total_orders, 3);
        assert!((report.total_revenue - 130.0).abs() < f64::EPSILON);

        let ranking: Vec<(i64, &str, i64)> = report
            .top_selling_books
            .iter()
            .map(|s| (s.book_id, s.title.as_str(), s.quantity))
            .collect();
        // book 2 and 3 tie on 5, lower id first
        assert_eq!(ranking, vec![(2, "B", 5), (3, "C", 5), (1, "A", 3)]);
    }

    #[test]
    fn test_window_excludes_older_orders() {
        let cancel = CancellationToken::new();
        let (books, orders) = stores();
        books.create(book("A", 10), &cancel).unwrap();

        let mut old = order(&[(1, 1)], 10.0);
        old.created_at = Utc::now() - Duration::days(3);
        orders.create(old, &cancel).unwrap();
        orders.create(order(&[(1, 2)], 20.0), &cancel).unwrap();

        let report = generate_report(&orders, &books, Duration::hours(24), &cancel).unwrap();
        assert_eq!(report.total_orders, 1);
        assert_eq!(report.top_selling_books[0].quantity, 2);
    }

    #[test]
    fn test_top_list_is_capped() {
        let cancel = CancellationToken::new();
        let (books, orders) = stores();
        for i in 0..12 {
            books.create(book(&format!("B{i}"), 100), &cancel).unwrap();
        }
        for id in 1..=12 {
            orders.create(order(&[(id, id)], 1.0), &cancel).unwrap();
        }

        let report = generate_report(&orders, &books, Duration::hours(1), &cancel).unwrap();
        assert_eq!(report.top_selling_books.len(), TOP_SELLING_LIMIT);
        assert_eq!(report.top_selling_books[0].book_id, 12);
    }

    #[test]
    fn test_empty_window() {
        let cancel = CancellationToken::new();
        let (books, orders) = stores();
        let report = generate_report(&orders, &books, Duration::hours(1), &cancel).unwrap();
        assert_eq!(report.total_orders, 0);
        assert_eq!(report.total_revenue, 0.0);
        assert!(report.top_selling_books.is_empty());
    }
}
