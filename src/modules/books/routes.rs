use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bookshelf_db::{Book, BookRepository, NewBook};
use bookshelf_http::{error::AppError, extract::JsonBody};

use super::models::{BookCreated, BookEcho, BookPayload, BookUpdated};
use crate::utils::{parse_id, MessageBody};

pub type BookStore = Arc<dyn BookRepository>;

const NOT_FOUND: &str = "Book not found";

/// `GET /books`
pub async fn list_books(State(store): State<BookStore>) -> Result<Json<Vec<Book>>, AppError> {
    let books = store
        .list_books()
        .await
        .map_err(|err| AppError::internal("Failed to fetch books", err))?;
    Ok(Json(books))
}

/// `GET /books/{id}`
pub async fn get_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&id).ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    store
        .find_book(id)
        .await
        .map_err(|err| AppError::internal("Failed to fetch book", err))?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// `POST /books`
pub async fn create_book(
    State(store): State<BookStore>,
    JsonBody(payload): JsonBody<BookPayload>,
) -> Result<(StatusCode, Json<BookCreated>), AppError> {
    ensure_publisher(store.as_ref(), payload.publisher_id).await?;

    let book = NewBook::from(payload);
    let id = store
        .insert_book(&book)
        .await
        .map_err(|err| AppError::internal("Failed to create book", err))?;

    tracing::info!(book_id = id, publisher_id = book.publisher_id, "book created");

    Ok((
        StatusCode::CREATED,
        Json(BookCreated {
            message: "Book created",
            id,
            book: BookEcho::new(id, book),
        }),
    ))
}

/// `PUT /books/{id}`
///
/// The publisher is checked before the id, so an unknown publisher wins
/// over an unknown book.
pub async fn update_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<BookPayload>,
) -> Result<Json<BookUpdated>, AppError> {
    ensure_publisher(store.as_ref(), payload.publisher_id).await?;

    let id = parse_id(&id).ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    let book = NewBook::from(payload);
    let matched = store
        .update_book(id, &book)
        .await
        .map_err(|err| AppError::internal("Failed to update book", err))?;
    if matched == 0 {
        return Err(AppError::not_found(NOT_FOUND));
    }

    Ok(Json(BookUpdated {
        message: "Book updated",
        book: BookEcho::new(id, book),
    }))
}

/// `DELETE /books/{id}`
pub async fn delete_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = parse_id(&id).ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    let deleted = store
        .delete_book(id)
        .await
        .map_err(|err| AppError::internal("Failed to delete book", err))?;
    if deleted == 0 {
        return Err(AppError::not_found(NOT_FOUND));
    }

    Ok(Json(MessageBody {
        message: "Book deleted",
    }))
}

/// Referential check run before every book write. It is a separate
/// statement from the write that follows.
async fn ensure_publisher(store: &dyn BookRepository, publisher_id: i64) -> Result<(), AppError> {
    let exists = store
        .publisher_exists(publisher_id)
        .await
        .map_err(|err| AppError::internal("Database error", err))?;
    if !exists {
        return Err(AppError::bad_request("Publisher does not exist"));
    }
    Ok(())
}
