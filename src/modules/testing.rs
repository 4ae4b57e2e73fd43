//! Test doubles shared by the controller tests.

use std::sync::{Arc, Mutex};

use catalog_db::{Book, EntityId, MemoryStore, NewBook};
use catalog_kernel::{Context, RenderError, Renderer};

/// Records every render call and answers with the template name.
#[derive(Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<(String, Context)>>,
}

impl RecordingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(String, Context)> {
        self.calls.lock().unwrap().clone()
    }

    /// Context of the most recent render of `template`.
    pub fn last(&self, template: &str) -> Context {
        self.calls()
            .into_iter()
            .rev()
            .find(|(name, _)| name == template)
            .map(|(_, context)| context)
            .unwrap_or_else(|| panic!("template {template} was never rendered"))
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        self.calls
            .lock()
            .unwrap()
            .push((template.to_string(), context.clone()));
        Ok(template.to_string())
    }
}

pub async fn seed_book(store: &MemoryStore, title: &str, genres: &[&EntityId]) -> Book {
    store
        .insert_book(NewBook {
            title: title.to_string(),
            author: "Anonymous".to_string(),
            summary: format!("{title} summary"),
            isbn: "978-0000000000".to_string(),
            genres: genres.iter().map(|id| (*id).clone()).collect(),
        })
        .await
        .unwrap()
}
