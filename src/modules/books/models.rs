use bookshelf_db::NewBook;
use serde::{Deserialize, Serialize};

/// Request body for creating or updating a book.
///
/// Field contents are not validated here; storage rejects what it cannot
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPayload {
    pub publisher_id: i64,
    pub name: String,
    pub date: String,
}

impl From<BookPayload> for NewBook {
    fn from(payload: BookPayload) -> Self {
        NewBook {
            publisher_id: payload.publisher_id,
            name: payload.name,
            date: payload.date,
        }
    }
}

/// The written fields echoed back from the request, not re-read.
#[derive(Debug, Clone, Serialize)]
pub struct BookEcho {
    pub id: i64,
    pub publisher_id: i64,
    pub name: String,
    pub date: String,
}

impl BookEcho {
    pub fn new(id: i64, book: NewBook) -> Self {
        Self {
            id,
            publisher_id: book.publisher_id,
            name: book.name,
            date: book.date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookCreated {
    pub message: &'static str,
    pub id: i64,
    pub book: BookEcho,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookUpdated {
    pub message: &'static str,
    pub book: BookEcho,
}
