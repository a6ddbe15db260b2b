//! Author store
//!
//! Book references to authors are kept consistent with one lock order:
//! author lock, then book lock. [`AuthorStore::delete`] counts books while
//! holding the author write lock; [`BookStore::create_with_author`] and
//! [`BookStore::update_with_author`] insert while holding the author read
//! lock.

use std::sync::Arc;

use parking_lot::RwLockReadGuard;
use shared::models::Author;
use tokio_util::sync::CancellationToken;

use super::book::BookStore;
use super::collection::{Collection, Entity, Table, check_cancelled};
use super::error::{StoreError, StoreResult};
use super::snapshot::Snapshot;

impl Entity for Author {
    const NAME: &'static str = "author";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[derive(Debug)]
pub struct AuthorStore {
    authors: Collection<Author>,
}

impl AuthorStore {
    pub fn new(snapshot: Arc<dyn Snapshot<Author>>) -> Self {
        Self {
            authors: Collection::new(snapshot),
        }
    }

    pub fn load_snapshot(&self) -> StoreResult<usize> {
        self.authors.load_snapshot()
    }

    pub fn create(&self, author: Author, cancel: &CancellationToken) -> StoreResult<Author> {
        let created = self.authors.create(author, cancel)?;
        tracing::info!(author_id = created.id, name = %created.full_name(), "Author created");
        Ok(created)
    }

    pub fn get(&self, id: i64, cancel: &CancellationToken) -> StoreResult<Author> {
        self.authors.get(id, cancel)
    }

    pub fn list(&self, cancel: &CancellationToken) -> StoreResult<Vec<Author>> {
        self.authors.list(cancel)
    }

    pub fn update(&self, id: i64, author: Author, cancel: &CancellationToken) -> StoreResult<Author> {
        let updated = self.authors.update(id, author, cancel)?;
        tracing::info!(author_id = id, "Author updated");
        Ok(updated)
    }

    /// Remove an author that no book references
    ///
    /// Fails with `NotFound` first, then `AuthorHasBooks`.
    pub fn delete(&self, id: i64, books: &BookStore, cancel: &CancellationToken) -> StoreResult<()> {
        check_cancelled(cancel)?;
        let pending = {
            let mut authors = self.authors.write();
            if !authors.contains(id) {
                return Err(StoreError::NotFound {
                    entity: Author::NAME,
                    id,
                });
            }
            let referenced = books.count_by_author(id, cancel)?;
            if referenced > 0 {
                return Err(StoreError::AuthorHasBooks {
                    author_id: id,
                    books: referenced,
                });
            }
            authors.remove(id)?;
            authors.pending()
        };
        self.authors.flush(pending)?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }

    /// Author table under the read lock, held by book inserts
    pub(crate) fn read_table(&self) -> RwLockReadGuard<'_, Table<Author>> {
        self.authors.read()
    }

    pub fn exists(&self, id: i64, cancel: &CancellationToken) -> StoreResult<bool> {
        check_cancelled(cancel)?;
        Ok(self.authors.read().contains(id))
    }

    /// IDs of authors whose first or last name equals one of `names`
    pub fn ids_by_name(&self, names: &[String], cancel: &CancellationToken) -> StoreResult<Vec<i64>> {
        check_cancelled(cancel)?;
        Ok(self
            .authors
            .read()
            .values()
            .filter(|a| names.iter().any(|n| *n == a.first_name || *n == a.last_name))
            .map(|a| a.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::snapshot::MemorySnapshot;
    use chrono::Utc;
    use shared::models::Book;

    fn book(author_id: i64) -> Book {
        Book {
            id: 0,
            title: "The Left Hand of Darkness".into(),
            author_id,
            genres: vec!["scifi".into()],
            published_at: Utc::now(),
            price: 8.0,
            stock: 1,
        }
    }

    fn author(first: &str, last: &str) -> Author {
        Author {
            id: 0,
            first_name: first.into(),
            last_name: last.into(),
            bio: String::new(),
        }
    }

    #[test]
    fn test_ids_by_name() {
        let store = AuthorStore::new(Arc::new(MemorySnapshot::<Author>::new()));
        let cancel = CancellationToken::new();
        store.create(author("Ursula", "Le Guin"), &cancel).unwrap();
        store.create(author("Terry", "Pratchett"), &cancel).unwrap();
        store.create(author("Terry", "Goodkind"), &cancel).unwrap();

        assert_eq!(store.ids_by_name(&["Terry".into()], &cancel).unwrap(), vec![2, 3]);
        assert_eq!(store.ids_by_name(&["Le Guin".into()], &cancel).unwrap(), vec![1]);
        assert!(store.ids_by_name(&["Nobody".into()], &cancel).unwrap().is_empty());
    }

    #[test]
    fn test_exists_and_delete() {
        let store = AuthorStore::new(Arc::new(MemorySnapshot::<Author>::new()));
        let books = BookStore::new(Arc::new(MemorySnapshot::<Book>::new()));
        let cancel = CancellationToken::new();
        let a = store.create(author("Ursula", "Le Guin"), &cancel).unwrap();

        assert!(store.exists(a.id, &cancel).unwrap());
        store.delete(a.id, &books, &cancel).unwrap();
        assert!(!store.exists(a.id, &cancel).unwrap());
        assert!(matches!(
            store.delete(a.id, &books, &cancel),
            Err(StoreError::NotFound { entity: "author", .. })
        ));
    }

    #[test]
    fn test_referenced_author_cannot_be_deleted() {
        let store = AuthorStore::new(Arc::new(MemorySnapshot::<Author>::new()));
        let books = BookStore::new(Arc::new(MemorySnapshot::<Book>::new()));
        let cancel = CancellationToken::new();
        let a = store.create(author("Ursula", "Le Guin"), &cancel).unwrap();
        let b = books.create_with_author(book(a.id), &store, &cancel).unwrap();

        assert!(matches!(
            store.delete(a.id, &books, &cancel),
            Err(StoreError::AuthorHasBooks { books: 1, .. })
        ));

        books.delete(b.id, &cancel).unwrap();
        store.delete(a.id, &books, &cancel).unwrap();
        assert!(matches!(
            books.create_with_author(book(a.id), &store, &cancel),
            Err(StoreError::AuthorMissing(_))
        ));
    }

    #[test]
    fn test_concurrent_book_create_and_author_delete_keep_references() {
        let store = AuthorStore::new(Arc::new(MemorySnapshot::<Author>::new()));
        let books = BookStore::new(Arc::new(MemorySnapshot::<Book>::new()));
        let cancel = CancellationToken::new();

        for _ in 0..200 {
            let a = store.create(author("Ursula", "Le Guin"), &cancel).unwrap();
            let (created, deleted) = std::thread::scope(|s| {
                let create = s.spawn(|| books.create_with_author(book(a.id), &store, &cancel));
                let delete = s.spawn(|| store.delete(a.id, &books, &cancel));
                (create.join().unwrap(), delete.join().unwrap())
            });

            // 恰好一方成功
            match (created, deleted) {
                (Ok(_), Err(StoreError::AuthorHasBooks { .. })) => {}
                (Err(StoreError::AuthorMissing(_)), Ok(())) => {}
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        for b in books.list(&cancel).unwrap() {
            assert!(store.exists(b.author_id, &cancel).unwrap());
        }
    }
}
