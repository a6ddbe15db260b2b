//! Book store
//!
//! Owns the authoritative `stock` counter. Order mutations move stock only
//! through [`BookStore::adjust_stock`], which validates every affected book
//! before touching any of them.

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::models::{Book, OrderItem, SearchCriteria};
use tokio_util::sync::CancellationToken;

use super::author::AuthorStore;
use super::collection::{Collection, Entity, Pending, check_cancelled};
use super::error::{StoreError, StoreResult};
use super::snapshot::Snapshot;

impl Entity for Book {
    const NAME: &'static str = "book";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Sum quantities per book, so repeated lines for one book count once
fn quantities_by_book(items: &[OrderItem]) -> StoreResult<BTreeMap<i64, i64>> {
    let mut totals = BTreeMap::new();
    for item in items {
        let total = totals.entry(item.book_id).or_insert(0i64);
        *total = total
            .checked_add(item.quantity)
            .ok_or_else(|| quantity_overflow(item.book_id))?;
    }
    Ok(totals)
}

fn quantity_overflow(book_id: i64) -> StoreError {
    StoreError::Validation(format!("quantity for book {book_id} is out of range"))
}

fn ensure_stock_non_negative(book: &Book) -> StoreResult<()> {
    if book.stock < 0 {
        return Err(StoreError::Validation(format!(
            "stock must not be negative (got {})",
            book.stock
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct BookStore {
    books: Collection<Book>,
}

impl BookStore {
    pub fn new(snapshot: Arc<dyn Snapshot<Book>>) -> Self {
        Self {
            books: Collection::new(snapshot),
        }
    }

    pub fn load_snapshot(&self) -> StoreResult<usize> {
        self.books.load_snapshot()
    }

    pub fn create(&self, book: Book, cancel: &CancellationToken) -> StoreResult<Book> {
        ensure_stock_non_negative(&book)?;
        let created = self.books.create(book, cancel)?;
        tracing::info!(book_id = created.id, title = %created.title, "Book created");
        Ok(created)
    }

    /// Create a book whose author must exist
    ///
    /// The author read lock is held until the book is inserted, so a
    /// concurrent [`AuthorStore::delete`] either sees the book or runs first.
    pub fn create_with_author(
        &self,
        book: Book,
        authors: &AuthorStore,
        cancel: &CancellationToken,
    ) -> StoreResult<Book> {
        check_cancelled(cancel)?;
        ensure_stock_non_negative(&book)?;

        let (created, pending) = {
            let authors = authors.read_table();
            if !authors.contains(book.author_id) {
                return Err(StoreError::AuthorMissing(book.author_id));
            }
            let mut books = self.books.write();
            let created = books.insert_new(book);
            (created, books.pending())
        };

        self.books.flush(pending)?;
        tracing::info!(book_id = created.id, title = %created.title, "Book created");
        Ok(created)
    }

    /// Replace a book, under the same author check as [`Self::create_with_author`]
    pub fn update_with_author(
        &self,
        id: i64,
        book: Book,
        authors: &AuthorStore,
        cancel: &CancellationToken,
    ) -> StoreResult<Book> {
        check_cancelled(cancel)?;
        ensure_stock_non_negative(&book)?;

        let (updated, pending) = {
            let authors = authors.read_table();
            if !authors.contains(book.author_id) {
                return Err(StoreError::AuthorMissing(book.author_id));
            }
            let mut books = self.books.write();
            let updated = books.replace(id, book)?;
            (updated, books.pending())
        };

        self.books.flush(pending)?;
        tracing::info!(book_id = id, "Book updated");
        Ok(updated)
    }

    pub fn get(&self, id: i64, cancel: &CancellationToken) -> StoreResult<Book> {
        self.books.get(id, cancel)
    }

    pub fn list(&self, cancel: &CancellationToken) -> StoreResult<Vec<Book>> {
        self.books.list(cancel)
    }

    pub fn update(&self, id: i64, book: Book, cancel: &CancellationToken) -> StoreResult<Book> {
        ensure_stock_non_negative(&book)?;
        let updated = self.books.update(id, book, cancel)?;
        tracing::info!(book_id = id, "Book updated");
        Ok(updated)
    }

    pub fn delete(&self, id: i64, cancel: &CancellationToken) -> StoreResult<()> {
        self.books.delete(id, cancel)?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Number of books referencing `author_id`
    pub fn count_by_author(&self, author_id: i64, cancel: &CancellationToken) -> StoreResult<usize> {
        check_cancelled(cancel)?;
        Ok(self
            .books
            .read()
            .values()
            .filter(|b| b.author_id == author_id)
            .count())
    }

    /// Search books by exactly one criteria dimension
    ///
    /// Precedence: titles, authors, genres, price range. Only the first
    /// present dimension is applied; the rest are ignored. Empty criteria
    /// match nothing. Author names are resolved through `authors` before
    /// the book lock is taken, so only one store lock is held at a time.
    pub fn search(
        &self,
        criteria: &SearchCriteria,
        authors: &AuthorStore,
        cancel: &CancellationToken,
    ) -> StoreResult<Vec<Book>> {
        check_cancelled(cancel)?;

        let author_ids = if criteria.titles.is_empty() && !criteria.authors.is_empty() {
            authors.ids_by_name(&criteria.authors, cancel)?
        } else {
            Vec::new()
        };
        let (min_price, max_price) = criteria.price_bounds();

        let matches = |book: &Book| -> bool {
            if !criteria.titles.is_empty() {
                criteria.titles.iter().any(|t| *t == book.title)
            } else if !criteria.authors.is_empty() {
                author_ids.contains(&book.author_id)
            } else if !criteria.genres.is_empty() {
                book.genres.iter().any(|g| criteria.genres.contains(g))
            } else if criteria.has_price_range() {
                book.price >= min_price && book.price <= max_price
            } else {
                false
            }
        };

        let books = self.books.read();
        let mut results = Vec::new();
        for book in books.values() {
            check_cancelled(cancel)?;
            if matches(book) {
                results.push(book.clone());
            }
        }
        Ok(results)
    }

    /// Two-phase stock move used by the order store
    ///
    /// Adds back every quantity in `restore`, then takes every quantity in
    /// `reserve`, as one unit under the book write lock:
    ///
    /// 1. validate: every reserved book exists and has enough stock once the
    ///    restored quantities are counted
    /// 2. commit: apply all restorations and decrements
    ///
    /// Any failure in phase 1 returns before a single book changes. Restored
    /// quantities for books deleted in the meantime are dropped with a
    /// warning. The caller flushes the returned state once its own lock is
    /// released.
    pub(crate) fn adjust_stock(
        &self,
        restore: &[OrderItem],
        reserve: &[OrderItem],
    ) -> StoreResult<Pending<Book>> {
        let restored = quantities_by_book(restore)?;
        let requested = quantities_by_book(reserve)?;

        let mut books = self.books.write();

        // Phase 1: validate
        for (&book_id, &quantity) in &restored {
            if let Some(book) = books.get(book_id) {
                book.stock
                    .checked_add(quantity)
                    .ok_or_else(|| quantity_overflow(book_id))?;
            }
        }
        for (&book_id, &quantity) in &requested {
            let book = books.get(book_id).ok_or(StoreError::BookMissing(book_id))?;
            let available = book.stock + restored.get(&book_id).copied().unwrap_or(0);
            if quantity > available {
                return Err(StoreError::InsufficientStock {
                    book_id,
                    requested: quantity,
                    available,
                });
            }
        }

        // Phase 2: commit, every sum below was checked above
        for (&book_id, &quantity) in &restored {
            match books.get_mut(book_id) {
                Some(book) => book.stock += quantity,
                None => tracing::warn!(
                    book_id,
                    quantity,
                    "Book no longer exists, restored quantity dropped"
                ),
            }
        }
        for (&book_id, &quantity) in &requested {
            if let Some(book) = books.get_mut(book_id) {
                book.stock -= quantity;
            }
        }
        books.touch();

        Ok(books.pending())
    }

    pub(crate) fn flush(&self, pending: Pending<Book>) -> StoreResult<()> {
        self.books.flush(pending)
    }
}
