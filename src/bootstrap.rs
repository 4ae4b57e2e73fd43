//! Application wiring: store, renderer, modules and the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use catalog_db::{DatabaseModule, MemoryStore};
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry, Renderer};
use catalog_views::HtmlRenderer;

use crate::modules;

/// Register the `db` core module and every catalog entity module.
pub fn build_registry(store: Arc<MemoryStore>, views: Arc<dyn Renderer>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_core(Arc::new(DatabaseModule::new(store.clone())));
    modules::register_all(&mut registry, store, views);
    registry
}

/// Run the catalog until Ctrl-C, then stop every module (flushing the store).
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        data_file = ?settings.database.data_file,
        "catalog bootstrap starting"
    );

    let store = Arc::new(MemoryStore::new(&settings.database));
    let views: Arc<dyn Renderer> = Arc::new(HtmlRenderer::new());
    let registry = build_registry(store, views);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry
        .init_all(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_all(&ctx)
        .await
        .context("module start failed")?;

    tracing::info!("catalog bootstrap complete");

    let served =
        catalog_http::start_server(&registry, &settings, catalog_http::shutdown_signal()).await;

    let stopped = registry.stop_all().await;
    served?;
    stopped.context("module shutdown failed")
}
