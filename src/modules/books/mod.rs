pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_db::BookRepository;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

/// `/books` routes
pub struct BooksModule {
    store: Arc<dyn BookRepository>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookRepository>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            date_strings = ctx.settings.database.date_strings,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", get(routes::list_books).post(routes::create_book))
            .route(
                "/books/{id}",
                get(routes::get_book)
                    .put(routes::update_book)
                    .delete(routes::delete_book),
            )
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
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer" }
        });
        let payload = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books with their publisher name",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error("Failed to fetch books")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": payload.clone(),
                        "responses": {
                            "201": { "description": "Book created" },
                            "400": error("Publisher does not exist or invalid body"),
                            "500": error("Storage failure")
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": error("Book not found"),
                            "500": error("Failed to fetch book")
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": payload,
                        "responses": {
                            "200": { "description": "Book updated" },
                            "400": error("Publisher does not exist or invalid body"),
                            "404": error("Book not found"),
                            "500": error("Storage failure")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": { "description": "Book deleted" },
                            "404": error("Book not found"),
                            "500": error("Failed to delete book")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "date": { "type": "string", "format": "date" },
                            "publisher": { "type": ["string", "null"] },
                            "publisher_id": { "type": "integer" }
                        },
                        "required": ["id", "name", "date", "publisher", "publisher_id"]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "publisher_id": { "type": "integer" },
                            "name": { "type": "string" },
                            "date": { "type": "string", "format": "date" }
                        },
                        "required": ["publisher_id", "name", "date"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn BookRepository>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
