//! Database gateway for bookshelf.
//!
//! [`Database`] owns the single MySQL connection shared by every request and
//! implements the [`BookRepository`] and [`PublisherRepository`] traits the
//! HTTP modules are written against. With the `memory` feature,
//! [`memory::MemoryDatabase`] offers the same contract in-process.

mod error;
pub mod models;
mod mysql;
pub mod repository;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use error::{DbError, DbResult};
pub use models::{Book, NewBook, NewPublisher, Publisher};
pub use mysql::Database;
pub use repository::{BookRepository, PublisherRepository};
