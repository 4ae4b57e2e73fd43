//! In-memory document store.
//!
//! Documents live in insertion-ordered collections behind a single
//! `tokio::sync::RwLock`, so every write is atomic per document. The store can
//! be backed by a JSON data file: [`MemoryStore::open`] loads it and
//! [`MemoryStore::close`] writes it back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use catalog_kernel::settings::DatabaseSettings;

use crate::models::{
    Book, BookInstance, BookInstanceDraft, BookInstanceStatus, BookInstanceWithBook, CatalogData,
    EntityId, Genre, GenreDraft, NewBook,
};
use crate::store::{BookInstanceStore, BookStore, GenreStore, StoreError, StoreResult};

struct State {
    open: bool,
    data: CatalogData,
}

impl State {
    fn ensure_open(&self) -> StoreResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(StoreError::Closed)
        }
    }

    fn book(&self, id: &EntityId) -> Option<&Book> {
        self.data.books.iter().find(|book| &book.id == id)
    }

    fn join(&self, instance: &BookInstance) -> BookInstanceWithBook {
        BookInstanceWithBook {
            instance: instance.clone(),
            book: self.book(&instance.book).cloned(),
        }
    }

    /// Schema checks applied to every book instance write.
    fn check_instance(
        &self,
        draft: &BookInstanceDraft,
    ) -> StoreResult<(EntityId, BookInstanceStatus)> {
        let book = EntityId::from(draft.book.as_str());
        if self.book(&book).is_none() {
            return Err(StoreError::Rejected(format!("book `{book}` does not exist")));
        }

        let status = if draft.status.is_empty() {
            BookInstanceStatus::default()
        } else {
            draft
                .status
                .parse::<BookInstanceStatus>()
                .map_err(StoreError::Rejected)?
        };

        Ok((book, status))
    }
}

pub struct MemoryStore {
    state: RwLock<State>,
    data_file: Option<PathBuf>,
    flush_on_close: bool,
}

impl MemoryStore {
    /// Create a closed store configured from settings. Call [`open`](Self::open)
    /// before use.
    pub fn new(settings: &DatabaseSettings) -> Self {
        Self {
            state: RwLock::new(State {
                open: false,
                data: CatalogData::default(),
            }),
            data_file: settings.data_file.clone(),
            flush_on_close: settings.flush_on_close,
        }
    }

    /// An already open store holding `data`, with no backing file.
    pub fn with_data(data: CatalogData) -> Self {
        Self {
            state: RwLock::new(State { open: true, data }),
            data_file: None,
            flush_on_close: false,
        }
    }

    /// An already open, empty store with no backing file.
    pub fn in_memory() -> Self {
        Self::with_data(CatalogData::default())
    }

    /// Load the data file (if configured and present) and accept operations.
    pub async fn open(&self) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.open {
            return Ok(());
        }

        if let Some(path) = &self.data_file {
            match read_data_file(path).await {
                Ok(data) => {
                    for problem in data.dangling_references() {
                        tracing::warn!(target: "catalog-db", %problem, "dangling reference in data file");
                    }
                    tracing::info!(
                        target: "catalog-db",
                        path = %path.display(),
                        genres = data.genres.len(),
                        books = data.books.len(),
                        book_instances = data.book_instances.len(),
                        "loaded data file"
                    );
                    state.data = data;
                }
                Err(StoreError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    tracing::info!(
                        target: "catalog-db",
                        path = %path.display(),
                        "data file not found, starting empty"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        state.open = true;
        Ok(())
    }

    /// Flush to the data file when configured, then reject further operations.
    pub async fn close(&self) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.open {
            return Ok(());
        }

        if let (true, Some(path)) = (self.flush_on_close, &self.data_file) {
            write_data_file(path, &state.data).await?;
            tracing::info!(target: "catalog-db", path = %path.display(), "flushed data file");
        }

        state.open = false;
        Ok(())
    }

    pub async fn is_open(&self) -> bool {
        self.state.read().await.open
    }

    /// Seed a book. Books are lookup data and have no controller write path.
    pub async fn insert_book(&self, new_book: NewBook) -> StoreResult<Book> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        let book = Book {
            id: EntityId::generate(),
            title: new_book.title,
            author: new_book.author,
            summary: new_book.summary,
            isbn: new_book.isbn,
            genres: new_book.genres,
        };
        state.data.books.push(book.clone());
        Ok(book)
    }

    /// Copy of everything currently stored.
    pub async fn snapshot(&self) -> StoreResult<CatalogData> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state.data.clone())
    }
}

/// Read and parse a catalog data file.
pub async fn read_data_file(path: &Path) -> StoreResult<CatalogData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&raw).map_err(|source| StoreError::Data {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_data_file(path: &Path, data: &CatalogData) -> StoreResult<()> {
    let raw = serde_json::to_string_pretty(data).map_err(|source| StoreError::Data {
        path: path.to_path_buf(),
        source,
    })?;

    tokio::fs::write(path, raw)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn all_genres(&self) -> StoreResult<Vec<Genre>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state.data.genres.clone())
    }

    async fn genre_by_id(&self, id: &EntityId) -> StoreResult<Option<Genre>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state.data.genres.iter().find(|genre| &genre.id == id).cloned())
    }

    async fn genre_by_name(&self, name: &str) -> StoreResult<Option<Genre>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state
            .data
            .genres
            .iter()
            .find(|genre| genre.name == name)
            .cloned())
    }

    async fn insert_genre(&self, draft: &GenreDraft) -> StoreResult<Genre> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        let genre = Genre {
            id: EntityId::generate(),
            name: draft.name.clone(),
        };
        state.data.genres.push(genre.clone());
        Ok(genre)
    }

    async fn update_genre(&self, id: &EntityId, draft: &GenreDraft) -> StoreResult<Option<Genre>> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        Ok(state
            .data
            .genres
            .iter_mut()
            .find(|genre| &genre.id == id)
            .map(|genre| {
                genre.name = draft.name.clone();
                genre.clone()
            }))
    }

    async fn delete_genre(&self, id: &EntityId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        let before = state.data.genres.len();
        state.data.genres.retain(|genre| &genre.id != id);
        Ok(state.data.genres.len() != before)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn all_books(&self) -> StoreResult<Vec<Book>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state.data.books.clone())
    }

    async fn book_by_id(&self, id: &EntityId) -> StoreResult<Option<Book>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state.book(id).cloned())
    }

    async fn books_by_genre(&self, genre: &EntityId) -> StoreResult<Vec<Book>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state
            .data
            .books
            .iter()
            .filter(|book| book.genres.contains(genre))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookInstanceStore for MemoryStore {
    async fn all_book_instances(&self) -> StoreResult<Vec<BookInstanceWithBook>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state
            .data
            .book_instances
            .iter()
            .map(|instance| state.join(instance))
            .collect())
    }

    async fn book_instance_by_id(
        &self,
        id: &EntityId,
    ) -> StoreResult<Option<BookInstanceWithBook>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state
            .data
            .book_instances
            .iter()
            .find(|instance| &instance.id == id)
            .map(|instance| state.join(instance)))
    }

    async fn book_instances_of(&self, book: &EntityId) -> StoreResult<Vec<BookInstance>> {
        let state = self.state.read().await;
        state.ensure_open()?;
        Ok(state
            .data
            .book_instances
            .iter()
            .filter(|instance| &instance.book == book)
            .cloned()
            .collect())
    }

    async fn insert_book_instance(&self, draft: &BookInstanceDraft) -> StoreResult<BookInstance> {
        let mut state = self.state.write().await;
        state.ensure_open()?;
        let (book, status) = state.check_instance(draft)?;

        let instance = BookInstance {
            id: EntityId::generate(),
            book,
            imprint: draft.imprint.clone(),
            status,
            due_back: draft.due_back,
        };
        state.data.book_instances.push(instance.clone());
        Ok(instance)
    }

    async fn update_book_instance(
        &self,
        id: &EntityId,
        draft: &BookInstanceDraft,
    ) -> StoreResult<Option<BookInstance>> {
        let mut state = self.state.write().await;
        state.ensure_open()?;
        let (book, status) = state.check_instance(draft)?;

        Ok(state
            .data
            .book_instances
            .iter_mut()
            .find(|instance| &instance.id == id)
            .map(|instance| {
                instance.book = book;
                instance.imprint = draft.imprint.clone();
                instance.status = status;
                instance.due_back = draft.due_back;
                instance.clone()
            }))
    }

    async fn delete_book_instance(&self, id: &EntityId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        let before = state.data.book_instances.len();
        state.data.book_instances.retain(|instance| &instance.id != id);
        Ok(state.data.book_instances.len() != before)
    }
}
