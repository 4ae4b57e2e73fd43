//! Store contract the entity controllers are written against.
//!
//! Every operation is asynchronous and may fail with a [`StoreError`]. Lookups
//! by id return `Ok(None)` for a missing document; deciding whether that is a
//! 404 or a redirect is the caller's business.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Book, BookInstance, BookInstanceDraft, BookInstanceWithBook, EntityId, Genre, GenreDraft,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store is closed")]
    Closed,

    #[error("document rejected: {0}")]
    Rejected(String),

    #[error("failed to access data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data file {path}: {source}")]
    Data {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres in insertion order.
    async fn all_genres(&self) -> StoreResult<Vec<Genre>>;

    async fn genre_by_id(&self, id: &EntityId) -> StoreResult<Option<Genre>>;

    /// Exact, case-sensitive name match.
    async fn genre_by_name(&self, name: &str) -> StoreResult<Option<Genre>>;

    /// Persist a new genre under a store-assigned id. `draft.id` is ignored.
    async fn insert_genre(&self, draft: &GenreDraft) -> StoreResult<Genre>;

    /// Replace the fields of genre `id`, keeping its identity. `Ok(None)` when
    /// no such genre exists.
    async fn update_genre(&self, id: &EntityId, draft: &GenreDraft) -> StoreResult<Option<Genre>>;

    /// Returns true if the genre existed and was deleted.
    async fn delete_genre(&self, id: &EntityId) -> StoreResult<bool>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn all_books(&self) -> StoreResult<Vec<Book>>;

    async fn book_by_id(&self, id: &EntityId) -> StoreResult<Option<Book>>;

    /// Books filed under the given genre.
    async fn books_by_genre(&self, genre: &EntityId) -> StoreResult<Vec<Book>>;
}

#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    /// All instances, each joined with its book, in insertion order.
    async fn all_book_instances(&self) -> StoreResult<Vec<BookInstanceWithBook>>;

    async fn book_instance_by_id(&self, id: &EntityId)
        -> StoreResult<Option<BookInstanceWithBook>>;

    /// Copies of the given book.
    async fn book_instances_of(&self, book: &EntityId) -> StoreResult<Vec<BookInstance>>;

    /// Persist a new instance under a store-assigned id. `draft.id` is ignored.
    async fn insert_book_instance(&self, draft: &BookInstanceDraft) -> StoreResult<BookInstance>;

    /// Replace the fields of instance `id`, keeping its identity. `Ok(None)`
    /// when no such instance exists.
    async fn update_book_instance(
        &self,
        id: &EntityId,
        draft: &BookInstanceDraft,
    ) -> StoreResult<Option<BookInstance>>;

    /// Returns true if the instance existed and was deleted.
    async fn delete_book_instance(&self, id: &EntityId) -> StoreResult<bool>;
}

/// Everything the catalog controllers need from persistence.
pub trait CatalogStore: GenreStore + BookStore + BookInstanceStore {}

impl<T> CatalogStore for T where T: GenreStore + BookStore + BookInstanceStore {}
