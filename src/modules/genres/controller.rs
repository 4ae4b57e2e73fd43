use std::sync::Arc;

use catalog_db::{CatalogStore, EntityId, GenreDraft};
use catalog_http::error::AppError;
use catalog_kernel::Renderer;
use serde_json::json;

use crate::modules::page::Page;
use crate::validation::{FieldRules, FormInput, Pipeline};

pub const LIST_URL: &str = "/catalog/genres";

const LIST_TEMPLATE: &str = "genre/genre_list";
const DETAIL_TEMPLATE: &str = "genre/genre_detail";
const FORM_TEMPLATE: &str = "genre/genre_form";
const DELETE_TEMPLATE: &str = "genre/genre_delete";

fn create_rules() -> Pipeline {
    Pipeline::new(vec![FieldRules::new("name", "Genre name required")
        .trim()
        .min_length(1)
        .escape()])
}

fn update_rules() -> Pipeline {
    Pipeline::new(vec![FieldRules::new(
        "name",
        "Genre name must contain at least 3 characters",
    )
    .trim()
    .min_length(3)
    .escape()])
}

/// List, detail, create, delete and update for genres.
pub struct GenreController {
    store: Arc<dyn CatalogStore>,
    views: Arc<dyn Renderer>,
}

impl GenreController {
    pub fn new(store: Arc<dyn CatalogStore>, views: Arc<dyn Renderer>) -> Self {
        Self { store, views }
    }

    fn render(&self, template: &str, values: serde_json::Value) -> Result<Page, AppError> {
        Page::render(self.views.as_ref(), template, values)
    }

    pub async fn list(&self) -> Result<Page, AppError> {
        let mut genre_list = self.store.all_genres().await?;
        genre_list.sort_by(|a, b| a.name.cmp(&b.name));

        self.render(
            LIST_TEMPLATE,
            json!({ "title": "Genre List", "genre_list": genre_list }),
        )
    }

    pub async fn detail(&self, id: &EntityId) -> Result<Page, AppError> {
        let (genre, genre_books) =
            tokio::try_join!(self.store.genre_by_id(id), self.store.books_by_genre(id))?;
        let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;

        self.render(
            DETAIL_TEMPLATE,
            json!({ "title": "Genre Detail", "genre": genre, "genre_books": genre_books }),
        )
    }

    pub async fn create_form(&self) -> Result<Page, AppError> {
        self.render(FORM_TEMPLATE, json!({ "title": "Create Genre" }))
    }

    pub async fn create(&self, input: &FormInput) -> Result<Page, AppError> {
        let validated = create_rules().run(input);
        let draft = GenreDraft {
            id: None,
            name: validated.text("name"),
        };

        if !validated.is_valid() {
            return self.render(
                FORM_TEMPLATE,
                json!({
                    "title": "Create Genre",
                    "genre": draft,
                    "errors": validated.errors(),
                }),
            );
        }

        if let Some(existing) = self.store.genre_by_name(&draft.name).await? {
            tracing::debug!(genre_id = %existing.id, "genre already exists, redirecting");
            return Ok(Page::redirect(existing.url()));
        }

        let genre = self.store.insert_genre(&draft).await?;
        tracing::info!(genre_id = %genre.id, name = %genre.name, "genre created");
        Ok(Page::redirect(genre.url()))
    }

    pub async fn delete_form(&self, id: &EntityId) -> Result<Page, AppError> {
        let (genre, genre_books) =
            tokio::try_join!(self.store.genre_by_id(id), self.store.books_by_genre(id))?;
        let Some(genre) = genre else {
            return Ok(Page::redirect(LIST_URL));
        };

        self.render(
            DELETE_TEMPLATE,
            json!({ "title": "Delete Genre", "genre": genre, "genre_books": genre_books }),
        )
    }

    /// Re-checks for referencing books at commit time; the confirmation page
    /// may be stale.
    pub async fn delete(&self, id: &EntityId) -> Result<Page, AppError> {
        let (genre, genre_books) =
            tokio::try_join!(self.store.genre_by_id(id), self.store.books_by_genre(id))?;
        let Some(genre) = genre else {
            return Ok(Page::redirect(LIST_URL));
        };

        if !genre_books.is_empty() {
            tracing::info!(
                genre_id = %genre.id,
                books = genre_books.len(),
                "genre delete blocked by referencing books"
            );
            return self.render(
                DELETE_TEMPLATE,
                json!({ "title": "Delete Genre", "genre": genre, "genre_books": genre_books }),
            );
        }

        self.store.delete_genre(id).await?;
        tracing::info!(genre_id = %id, "genre deleted");
        Ok(Page::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: &EntityId) -> Result<Page, AppError> {
        let genre = self
            .store
            .genre_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Genre not found"))?;

        self.render(
            FORM_TEMPLATE,
            json!({ "title": "Update Genre", "genre": GenreDraft::from(&genre) }),
        )
    }

    pub async fn update(&self, id: &EntityId, input: &FormInput) -> Result<Page, AppError> {
        let validated = update_rules().run(input);
        let draft = GenreDraft {
            id: Some(id.clone()),
            name: validated.text("name"),
        };

        if !validated.is_valid() {
            return self.render(
                FORM_TEMPLATE,
                json!({
                    "title": "Update Genre",
                    "genre": draft,
                    "errors": validated.errors(),
                }),
            );
        }

        let genre = self
            .store
            .update_genre(id, &draft)
            .await?
            .ok_or_else(|| AppError::not_found("Genre not found"))?;
        tracing::info!(genre_id = %genre.id, name = %genre.name, "genre updated");
        Ok(Page::redirect(genre.url()))
    }
}
