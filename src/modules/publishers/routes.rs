use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bookshelf_db::{NewPublisher, Publisher, PublisherRepository};
use bookshelf_http::{error::AppError, extract::JsonBody};

use super::models::{PublisherCreated, PublisherPayload};
use crate::utils::{parse_id, MessageBody, UNMATCHED_ID};

pub type PublisherStore = Arc<dyn PublisherRepository>;

/// `GET /publishers`
pub async fn list_publishers(
    State(store): State<PublisherStore>,
) -> Result<Json<Vec<Publisher>>, AppError> {
    let publishers = store
        .list_publishers()
        .await
        .map_err(|err| AppError::internal("Failed to fetch publishers", err))?;
    Ok(Json(publishers))
}

/// `POST /publishers`
pub async fn create_publisher(
    State(store): State<PublisherStore>,
    JsonBody(payload): JsonBody<PublisherPayload>,
) -> Result<(StatusCode, Json<PublisherCreated>), AppError> {
    let publisher = NewPublisher::from(payload);
    let id = store
        .insert_publisher(&publisher)
        .await
        .map_err(|err| AppError::internal("Failed to create publisher", err))?;

    tracing::info!(publisher_id = id, "publisher created");

    Ok((
        StatusCode::CREATED,
        Json(PublisherCreated {
            message: "Publisher created",
            id,
            publisher: Publisher {
                id,
                name: publisher.name,
                address: publisher.address,
                contact: publisher.contact,
            },
        }),
    ))
}

/// `DELETE /publishers/{id}`
///
/// Refused while any book references the publisher. The reference check
/// and the delete are separate statements.
pub async fn delete_publisher(
    State(store): State<PublisherStore>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = parse_id(&id);

    // Text ids still run the reference check, as the id MySQL would compare.
    let referenced = store
        .has_books(id.unwrap_or(UNMATCHED_ID))
        .await
        .map_err(|err| AppError::internal("Database error", err))?;
    if referenced {
        return Err(AppError::bad_request(
            "Cannot delete publisher - books are associated with it",
        ));
    }

    let id = id.ok_or_else(|| AppError::not_found("Publisher not found"))?;
    let deleted = store
        .delete_publisher(id)
        .await
        .map_err(|err| AppError::internal("Failed to delete publisher", err))?;
    if deleted == 0 {
        return Err(AppError::not_found("Publisher not found"));
    }

    Ok(Json(MessageBody {
        message: "Publisher deleted",
    }))
}
