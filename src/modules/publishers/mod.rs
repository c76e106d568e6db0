pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{delete, get},
    Router,
};
use bookshelf_db::PublisherRepository;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

/// `/publishers` routes
pub struct PublishersModule {
    store: Arc<dyn PublisherRepository>,
}

impl PublishersModule {
    pub fn new(store: Arc<dyn PublisherRepository>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for PublishersModule {
    fn name(&self) -> &'static str {
        "publishers"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "publishers module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/publishers",
                get(routes::list_publishers).post(routes::create_publisher),
            )
            .route("/publishers/{id}", delete(routes::delete_publisher))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/publishers": {
                    "get": {
                        "summary": "List publishers",
                        "tags": ["Publishers"],
                        "responses": {
                            "200": {
                                "description": "All publishers",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Publisher" }
                                        }
                                    }
                                }
                            },
                            "500": error("Failed to fetch publishers")
                        }
                    },
                    "post": {
                        "summary": "Create a publisher",
                        "tags": ["Publishers"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/PublisherPayload" }
                                }
                            }
                        },
                        "responses": {
                            "201": { "description": "Publisher created" },
                            "400": error("Invalid body"),
                            "500": error("Failed to create publisher")
                        }
                    }
                },
                "/publishers/{id}": {
                    "delete": {
                        "summary": "Delete a publisher with no books",
                        "tags": ["Publishers"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "200": { "description": "Publisher deleted" },
                            "400": error("Cannot delete publisher - books are associated with it"),
                            "404": error("Publisher not found"),
                            "500": error("Storage failure")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Publisher": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "address": { "type": "string" },
                            "contact": { "type": "string" }
                        },
                        "required": ["id", "name", "address", "contact"]
                    },
                    "PublisherPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "address": { "type": "string" },
                            "contact": { "type": "string" }
                        },
                        "required": ["name", "address", "contact"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the publishers module
pub fn create_module(store: Arc<dyn PublisherRepository>) -> Arc<dyn Module> {
    Arc::new(PublishersModule::new(store))
}
