//! In-process backend mirroring the SQL statements issued by [`Database`].
//!
//! Ids auto-increment from 1 and are never reused, book reads follow the
//! same left/inner join split, writes report matched rows, and dates that
//! MySQL would reject are rejected. [`MemoryDatabase::set_offline`] makes
//! every call fail, standing in for a lost connection, and
//! [`MemoryDatabase::set_failing_writes`] fails only inserts, updates and
//! deletes so a handler's read-side check can pass first.
//!
//! [`Database`]: crate::Database

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::{format_date, parse_date};
use crate::{
    Book, BookRepository, DbError, DbResult, NewBook, NewPublisher, Publisher, PublisherRepository,
};

struct StoredBook {
    name: String,
    date: time::Date,
    publisher_id: i64,
}

#[derive(Default)]
struct State {
    publishers: BTreeMap<i64, Publisher>,
    books: BTreeMap<i64, StoredBook>,
    last_publisher_id: i64,
    last_book_id: i64,
}

impl State {
    fn render(&self, id: i64, book: &StoredBook, publisher: Option<&Publisher>) -> DbResult<Book> {
        Ok(Book {
            id,
            name: book.name.clone(),
            date: format_date(book.date)?,
            publisher: publisher.map(|p| p.name.clone()),
            publisher_id: book.publisher_id,
        })
    }
}

#[derive(Default)]
pub struct MemoryDatabase {
    state: Mutex<State>,
    offline: AtomicBool,
    failing_writes: AtomicBool,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent call with [`DbError::Unavailable`] while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail every subsequent write with [`DbError::Unavailable`] while set.
    /// Reads keep working.
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    fn state(&self) -> DbResult<MutexGuard<'_, State>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable);
        }
        self.state.lock().map_err(|_| DbError::Unavailable)
    }

    fn state_for_write(&self) -> DbResult<MutexGuard<'_, State>> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable);
        }
        self.state()
    }
}

fn stored_book(book: &NewBook) -> DbResult<StoredBook> {
    let date = parse_date(&book.date).map_err(|_| DbError::InvalidValue {
        column: "date",
        value: book.date.clone(),
    })?;
    Ok(StoredBook {
        name: book.name.clone(),
        date,
        publisher_id: book.publisher_id,
    })
}

#[async_trait]
impl BookRepository for MemoryDatabase {
    async fn list_books(&self) -> DbResult<Vec<Book>> {
        let state = self.state()?;
        state
            .books
            .iter()
            .map(|(id, book)| state.render(*id, book, state.publishers.get(&book.publisher_id)))
            .collect()
    }

    async fn find_book(&self, id: i64) -> DbResult<Option<Book>> {
        let state = self.state()?;
        let Some(book) = state.books.get(&id) else {
            return Ok(None);
        };
        match state.publishers.get(&book.publisher_id) {
            Some(publisher) => state.render(id, book, Some(publisher)).map(Some),
            None => Ok(None),
        }
    }

    async fn publisher_exists(&self, publisher_id: i64) -> DbResult<bool> {
        Ok(self.state()?.publishers.contains_key(&publisher_id))
    }

    async fn insert_book(&self, book: &NewBook) -> DbResult<i64> {
        let mut state = self.state_for_write()?;
        let stored = stored_book(book)?;
        state.last_book_id += 1;
        let id = state.last_book_id;
        state.books.insert(id, stored);
        Ok(id)
    }

    async fn update_book(&self, id: i64, book: &NewBook) -> DbResult<u64> {
        let mut state = self.state_for_write()?;
        // A WHERE clause matching nothing never evaluates the new values.
        let Some(existing) = state.books.get_mut(&id) else {
            return Ok(0);
        };
        *existing = stored_book(book)?;
        Ok(1)
    }

    async fn delete_book(&self, id: i64) -> DbResult<u64> {
        let mut state = self.state_for_write()?;
        Ok(state.books.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl PublisherRepository for MemoryDatabase {
    async fn list_publishers(&self) -> DbResult<Vec<Publisher>> {
        Ok(self.state()?.publishers.values().cloned().collect())
    }

    async fn insert_publisher(&self, publisher: &NewPublisher) -> DbResult<i64> {
        let mut state = self.state_for_write()?;
        state.last_publisher_id += 1;
        let id = state.last_publisher_id;
        state.publishers.insert(
            id,
            Publisher {
                id,
                name: publisher.name.clone(),
                address: publisher.address.clone(),
                contact: publisher.contact.clone(),
            },
        );
        Ok(id)
    }

    async fn has_books(&self, publisher_id: i64) -> DbResult<bool> {
        let state = self.state()?;
        Ok(state
            .books
            .values()
            .any(|book| book.publisher_id == publisher_id))
    }

    async fn delete_publisher(&self, id: i64) -> DbResult<u64> {
        let mut state = self.state_for_write()?;
        Ok(state.publishers.remove(&id).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> NewPublisher {
        NewPublisher {
            name: "Acme".to_string(),
            address: "1 Rd".to_string(),
            contact: "a@a.com".to_string(),
        }
    }

    fn book(publisher_id: i64, date: &str) -> NewBook {
        NewBook {
            publisher_id,
            name: "Title".to_string(),
            date: date.to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let db = MemoryDatabase::new();
        let first = db.insert_publisher(&acme()).await.unwrap();
        assert_eq!(db.delete_publisher(first).await.unwrap(), 1);
        let second = db.insert_publisher(&acme()).await.unwrap();
        assert_eq!(second, first + 1);
    }

    #[tokio::test]
    async fn dangling_publisher_visible_in_list_but_not_by_id() {
        let db = MemoryDatabase::new();
        let id = db.insert_book(&book(77, "2024-01-01")).await.unwrap();

        let listed = db.list_books().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].publisher, None);
        assert_eq!(listed[0].publisher_id, 77);

        assert_eq!(db.find_book(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_dates_are_rejected_like_storage() {
        let db = MemoryDatabase::new();
        let err = db.insert_book(&book(1, "not-a-date")).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidValue { column: "date", .. }));
        assert!(db.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_reports_matched_rows() {
        let db = MemoryDatabase::new();
        let publisher = db.insert_publisher(&acme()).await.unwrap();
        let id = db.insert_book(&book(publisher, "2024-01-01")).await.unwrap();

        assert_eq!(db.update_book(id, &book(publisher, "2024-02-02")).await.unwrap(), 1);
        assert_eq!(db.update_book(id + 1, &book(publisher, "2024-02-02")).await.unwrap(), 0);
        assert_eq!(db.find_book(id).await.unwrap().unwrap().date, "2024-02-02");
        assert_eq!(db.update_book(id + 1, &book(publisher, "someday")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn offline_fails_every_call() {
        let db = MemoryDatabase::new();
        db.set_offline(true);
        assert!(matches!(db.list_publishers().await, Err(DbError::Unavailable)));
        assert!(matches!(db.has_books(1).await, Err(DbError::Unavailable)));

        db.set_offline(false);
        assert!(db.list_publishers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_writes_leave_reads_working() {
        let db = MemoryDatabase::new();
        let publisher = db.insert_publisher(&acme()).await.unwrap();
        let id = db.insert_book(&book(publisher, "2024-01-01")).await.unwrap();
        db.set_failing_writes(true);

        assert!(db.publisher_exists(publisher).await.unwrap());
        assert!(db.has_books(publisher).await.unwrap());
        assert!(matches!(
            db.update_book(id, &book(publisher, "2024-02-02")).await,
            Err(DbError::Unavailable)
        ));
        assert!(matches!(db.delete_book(id).await, Err(DbError::Unavailable)));
        assert!(matches!(
            db.delete_publisher(publisher).await,
            Err(DbError::Unavailable)
        ));
        assert!(matches!(db.insert_publisher(&acme()).await, Err(DbError::Unavailable)));

        db.set_failing_writes(false);
        assert_eq!(db.find_book(id).await.unwrap().unwrap().date, "2024-01-01");
        assert_eq!(db.delete_book(id).await.unwrap(), 1);
    }
}
