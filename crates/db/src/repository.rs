use async_trait::async_trait;

use crate::{Book, DbResult, NewBook, NewPublisher, Publisher};

/// Queries backing the `/books` routes.
///
/// Writes do not check the publisher themselves; callers run
/// [`BookRepository::publisher_exists`] first as a separate statement.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Every book, left-joined with its publisher name.
    async fn list_books(&self) -> DbResult<Vec<Book>>;

    /// One book, inner-joined with its publisher: a dangling
    /// `publisher_id` yields `None`.
    async fn find_book(&self, id: i64) -> DbResult<Option<Book>>;

    async fn publisher_exists(&self, publisher_id: i64) -> DbResult<bool>;

    /// Returns the generated id.
    async fn insert_book(&self, book: &NewBook) -> DbResult<i64>;

    /// Returns the number of rows matched.
    async fn update_book(&self, id: i64, book: &NewBook) -> DbResult<u64>;

    async fn delete_book(&self, id: i64) -> DbResult<u64>;
}

/// Queries backing the `/publishers` routes.
#[async_trait]
pub trait PublisherRepository: Send + Sync {
    async fn list_publishers(&self) -> DbResult<Vec<Publisher>>;

    async fn insert_publisher(&self, publisher: &NewPublisher) -> DbResult<i64>;

    /// Whether any book references the publisher.
    async fn has_books(&self, publisher_id: i64) -> DbResult<bool>;

    async fn delete_publisher(&self, id: i64) -> DbResult<u64>;
}
