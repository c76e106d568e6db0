use bookshelf_db::{NewPublisher, Publisher};
use serde::{Deserialize, Serialize};

/// Request body for creating a publisher. No uniqueness or format checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherPayload {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl From<PublisherPayload> for NewPublisher {
    fn from(payload: PublisherPayload) -> Self {
        NewPublisher {
            name: payload.name,
            address: payload.address,
            contact: payload.contact,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublisherCreated {
    pub message: &'static str,
    pub id: i64,
    pub publisher: Publisher,
}
