pub mod controller;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::get,
    Form, Router,
};
use catalog_db::{CatalogStore, EntityId};
use catalog_http::error::AppError;
use catalog_kernel::{InitCtx, Module, Renderer};

use crate::modules::page::Page;
use crate::validation::FormInput;
use controller::GenreController;

/// Genre pages mounted under `/catalog`
pub struct GenresModule {
    controller: Arc<GenreController>,
}

impl GenresModule {
    pub fn new(store: Arc<dyn CatalogStore>, views: Arc<dyn Renderer>) -> Self {
        Self {
            controller: Arc::new(GenreController::new(store, views)),
        }
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "genres module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/genres", get(list))
            .route("/genre/create", get(create_form).post(create))
            .route("/genre/{id}", get(detail))
            .route("/genre/{id}/delete", get(delete_form).post(delete))
            .route("/genre/{id}/update", get(update_form).post(update))
            .with_state(self.controller.clone())
    }
}

type Ctl = State<Arc<GenreController>>;

async fn list(State(ctl): Ctl) -> Result<Page, AppError> {
    ctl.list().await
}

async fn detail(State(ctl): Ctl, Path(id): Path<String>) -> Result<Page, AppError> {
    ctl.detail(&EntityId::from(id)).await
}

async fn create_form(State(ctl): Ctl) -> Result<Page, AppError> {
    ctl.create_form().await
}

async fn create(State(ctl): Ctl, Form(input): Form<FormInput>) -> Result<Page, AppError> {
    ctl.create(&input).await
}

async fn delete_form(State(ctl): Ctl, Path(id): Path<String>) -> Result<Page, AppError> {
    ctl.delete_form(&EntityId::from(id)).await
}

async fn delete(State(ctl): Ctl, Path(id): Path<String>) -> Result<Page, AppError> {
    ctl.delete(&EntityId::from(id)).await
}

async fn update_form(State(ctl): Ctl, Path(id): Path<String>) -> Result<Page, AppError> {
    ctl.update_form(&EntityId::from(id)).await
}

async fn update(
    State(ctl): Ctl,
    Path(id): Path<String>,
    Form(input): Form<FormInput>,
) -> Result<Page, AppError> {
    ctl.update(&EntityId::from(id), &input).await
}

/// Create the genres module over a shared store and renderer
pub fn create_module(store: Arc<dyn CatalogStore>, views: Arc<dyn Renderer>) -> Arc<dyn Module> {
    Arc::new(GenresModule::new(store, views))
}
