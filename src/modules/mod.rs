pub mod books;
pub mod publishers;

use std::sync::Arc;

use bookshelf_db::{BookRepository, PublisherRepository};
use bookshelf_kernel::ModuleRegistry;

/// Register every module against one shared storage handle
pub fn register_all<S>(registry: &mut ModuleRegistry, store: Arc<S>)
where
    S: BookRepository + PublisherRepository + 'static,
{
    registry.register(books::create_module(store.clone()));
    registry.register(publishers::create_module(store));
}

/// A registry holding every module, ready for the HTTP server
pub fn build_registry<S>(store: Arc<S>) -> ModuleRegistry
where
    S: BookRepository + PublisherRepository + 'static,
{
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, store);
    registry
}
