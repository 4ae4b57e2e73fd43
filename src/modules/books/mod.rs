//! Read-only book pages. Genre and book instance views link here.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use catalog_db::{CatalogStore, EntityId};
use catalog_http::error::AppError;
use catalog_kernel::{InitCtx, Module, Renderer};
use serde_json::json;

use crate::modules::page::Page;

pub struct BookController {
    store: Arc<dyn CatalogStore>,
    views: Arc<dyn Renderer>,
}

impl BookController {
    pub fn new(store: Arc<dyn CatalogStore>, views: Arc<dyn Renderer>) -> Self {
        Self { store, views }
    }

    pub async fn list(&self) -> Result<Page, AppError> {
        let mut book_list = self.store.all_books().await?;
        book_list.sort_by(|a, b| a.title.cmp(&b.title));

        Page::render(
            self.views.as_ref(),
            "book/book_list",
            json!({ "title": "Book List", "book_list": book_list }),
        )
    }

    pub async fn detail(&self, id: &EntityId) -> Result<Page, AppError> {
        let (book, book_instances, genres) = tokio::try_join!(
            self.store.book_by_id(id),
            self.store.book_instances_of(id),
            self.store.all_genres()
        )?;
        let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;
        let book_genres: Vec<_> = genres
            .into_iter()
            .filter(|genre| book.genres.contains(&genre.id))
            .collect();

        Page::render(
            self.views.as_ref(),
            "book/book_detail",
            json!({
                "title": book.title,
                "book": book,
                "book_genres": book_genres,
                "book_instances": book_instances,
            }),
        )
    }
}

pub struct BooksModule {
    controller: Arc<BookController>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn CatalogStore>, views: Arc<dyn Renderer>) -> Self {
        Self {
            controller: Arc::new(BookController::new(store, views)),
        }
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
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", get(list_books))
            .route("/book/{id}", get(book_detail))
            .with_state(self.controller.clone())
    }
}

async fn list_books(State(ctl): State<Arc<BookController>>) -> Result<Page, AppError> {
    ctl.list().await
}

async fn book_detail(
    State(ctl): State<Arc<BookController>>,
    Path(id): Path<String>,
) -> Result<Page, AppError> {
    ctl.detail(&EntityId::from(id)).await
}

/// Create the books module over a shared store and renderer
pub fn create_module(store: Arc<dyn CatalogStore>, views: Arc<dyn Renderer>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store, views))
}
