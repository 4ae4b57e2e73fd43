pub mod bookinstances;
pub mod books;
pub mod genres;
pub mod page;

#[cfg(test)]
mod routes;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use catalog_db::CatalogStore;
use catalog_kernel::{ModuleRegistry, Renderer};

/// Register the catalog entity modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: Arc<dyn CatalogStore>,
    views: Arc<dyn Renderer>,
) {
    registry.register_custom(genres::create_module(store.clone(), views.clone()));
    registry.register_custom(bookinstances::create_module(store.clone(), views.clone()));
    registry.register_custom(books::create_module(store, views));
}
