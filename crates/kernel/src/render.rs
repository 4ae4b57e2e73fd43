//! The seam between controllers and whatever turns a view into HTML.

use thiserror::Error;

/// Named values handed to a template.
pub type Context = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("context for template '{template}' is malformed: {source}")]
    Context {
        template: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Produces a response body from a template name and its context.
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, context: &Context) -> Result<String, RenderError>;
}

/// Build a [`Context`] from a `json!({ ... })` object literal.
///
/// Non-object values produce an empty context.
pub fn context(value: serde_json::Value) -> Context {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Context::new(),
    }
}
