//! Bookshelf application library
//!
//! The `books` and `publishers` modules and the helpers they share.

pub mod modules;
pub mod utils;

pub use modules::build_registry;
