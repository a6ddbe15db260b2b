//! Order store
//!
//! Couples order records with book stock. Every mutation runs as:
//!
//! ```text
//! order write lock
//!     ├─ 1. look up the existing order (update / delete)
//!     ├─ 2. BookStore::adjust_stock(restore, reserve)   (book write lock)
//!     │      ├─ validate every affected book
//!     │      └─ commit all restorations and decrements
//!     └─ 3. insert / replace / remove the order record
//! release
//! flush books snapshot, flush orders snapshot
//! ```
//!
//! Lock order is always order lock, then book lock. Nothing takes the book
//! lock first and then waits on the order lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::models::{Book, Order, OrderItem};
use tokio_util::sync::CancellationToken;

use super::book::BookStore;
use super::collection::{Collection, Entity, Pending, check_cancelled};
use super::error::{StoreError, StoreResult};
use super::snapshot::Snapshot;

impl Entity for Order {
    const NAME: &'static str = "order";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

fn validate_items(items: &[OrderItem]) -> StoreResult<()> {
    if items.is_empty() {
        return Err(StoreError::Validation("order must contain at least one item".into()));
    }
    if let Some(item) = items.iter().find(|i| i.quantity <= 0) {
        return Err(StoreError::Validation(format!(
            "quantity for book {} must be positive (got {})",
            item.book_id, item.quantity
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct OrderStore {
    orders: Collection<Order>,
    books: Arc<BookStore>,
}

impl OrderStore {
    pub fn new(snapshot: Arc<dyn Snapshot<Order>>, books: Arc<BookStore>) -> Self {
        Self {
            orders: Collection::new(snapshot),
            books,
        }
    }

    pub fn load_snapshot(&self) -> StoreResult<usize> {
        self.orders.load_snapshot()
    }

    /// Reserve stock for every item and store the order
    ///
    /// Fails with `BookMissing` or `InsufficientStock` without changing any
    /// book. `Persistence` means the order exists in memory but a snapshot
    /// write failed.
    pub fn create(&self, order: Order, cancel: &CancellationToken) -> StoreResult<Order> {
        check_cancelled(cancel)?;
        validate_items(&order.items)?;

        let (created, books_pending, orders_pending) = {
            let mut orders = self.orders.write();
            check_cancelled(cancel)?;

            let books_pending = self.books.adjust_stock(&[], &order.items)?;
            let created = orders.insert_new(order);
            (created, books_pending, orders.pending())
        };

        tracing::info!(
            order_id = created.id,
            customer_id = created.customer_id,
            items = created.items.len(),
            "Order created"
        );
        self.flush(books_pending, orders_pending)?;
        Ok(created)
    }

    pub fn get(&self, id: i64, cancel: &CancellationToken) -> StoreResult<Order> {
        self.orders.get(id, cancel)
    }

    pub fn list(&self, cancel: &CancellationToken) -> StoreResult<Vec<Order>> {
        self.orders.list(cancel)
    }

    /// Replace an order, moving stock from the old items to the new ones
    ///
    /// Restoring the old quantities, re-validating and reserving the new
    /// ones is a single unit: on `InsufficientStock` or `BookMissing` both
    /// the order and every book are left exactly as they were.
    pub fn update(&self, id: i64, order: Order, cancel: &CancellationToken) -> StoreResult<Order> {
        check_cancelled(cancel)?;
        validate_items(&order.items)?;

        let (updated, books_pending, orders_pending) = {
            let mut orders = self.orders.write();
            check_cancelled(cancel)?;

            let existing = orders.get(id).cloned().ok_or(StoreError::NotFound {
                entity: Order::NAME,
                id,
            })?;
            let books_pending = self.books.adjust_stock(&existing.items, &order.items)?;
            let updated = orders.replace(id, order)?;
            (updated, books_pending, orders.pending())
        };

        tracing::info!(order_id = id, "Order updated");
        self.flush(books_pending, orders_pending)?;
        Ok(updated)
    }

    /// Remove an order and give its quantities back to stock
    pub fn delete(&self, id: i64, cancel: &CancellationToken) -> StoreResult<()> {
        check_cancelled(cancel)?;

        let (books_pending, orders_pending) = {
            let mut orders = self.orders.write();
            check_cancelled(cancel)?;

            let existing = orders.get(id).cloned().ok_or(StoreError::NotFound {
                entity: Order::NAME,
                id,
            })?;
            let books_pending = self.books.adjust_stock(&existing.items, &[])?;
            orders.remove(id)?;
            (books_pending, orders.pending())
        };

        tracing::info!(order_id = id, "Order deleted, stock restored");
        self.flush(books_pending, orders_pending)
    }

    /// Orders with `start <= created_at < end`, in ID order
    pub fn in_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> StoreResult<Vec<Order>> {
        check_cancelled(cancel)?;
        Ok(self
            .orders
            .read()
            .values()
            .filter(|o| o.created_at >= start && o.created_at < end)
            .cloned()
            .collect())
    }

    /// Customer owning order `id`, if the order exists
    pub fn owner_of(&self, id: i64, cancel: &CancellationToken) -> StoreResult<Option<i64>> {
        check_cancelled(cancel)?;
        Ok(self.orders.read().get(id).map(|o| o.customer_id))
    }

    /// Both flushes are attempted; the first failure is reported
    fn flush(&self, books: Pending<Book>, orders: Pending<Order>) -> StoreResult<()> {
        let books_result = self.books.flush(books);
        let orders_result = self.orders.flush(orders);
        books_result.and(orders_result)
    }
}
