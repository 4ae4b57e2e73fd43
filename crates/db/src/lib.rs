//! Catalog persistence: entity models, the store contract controllers depend
//! on, and an in-memory document store implementing it.

pub mod memory;
pub mod models;
pub mod module;
pub mod store;

pub use memory::MemoryStore;
pub use models::{
    Book, BookInstance, BookInstanceDraft, BookInstanceStatus, BookInstanceWithBook, CatalogData,
    EntityId, Genre, GenreDraft, NewBook,
};
pub use module::DatabaseModule;
pub use store::{BookInstanceStore, BookStore, CatalogStore, GenreStore, StoreError, StoreResult};
