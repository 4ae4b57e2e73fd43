use std::sync::Arc;

use async_trait::async_trait;
use catalog_kernel::{InitCtx, Module};

use crate::memory::MemoryStore;

/// Core module owning the store lifecycle: opened on init, closed on stop.
pub struct DatabaseModule {
    store: Arc<MemoryStore>,
}

impl DatabaseModule {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.store.open().await?;
        tracing::info!(
            module = self.name(),
            data_file = ?ctx.settings.database.data_file,
            "document store opened"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store.close().await?;
        tracing::info!(module = self.name(), "document store closed");
        Ok(())
    }
}
