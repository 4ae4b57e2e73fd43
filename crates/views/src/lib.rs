//! HTML views for the catalog.
//!
//! Templates are compile-time [`maud`] functions. [`HtmlRenderer`] maps a
//! template name to its function and deserializes the controller's context
//! into the typed struct that function expects, so a context missing a field
//! surfaces as a [`RenderError::Context`] rather than a blank page.

mod book;
mod bookinstance;
mod genre;
mod layout;

use catalog_kernel::{Context, RenderError, Renderer};
use serde::de::DeserializeOwned;

/// Renders every catalog template.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub const fn new() -> Self {
        Self
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        let markup = match template {
            "genre/genre_list" => genre::list(&parse(template, context)?),
            "genre/genre_detail" => genre::detail(&parse(template, context)?),
            "genre/genre_form" => genre::form(&parse(template, context)?),
            "genre/genre_delete" => genre::delete(&parse(template, context)?),
            "bookinstance/bookinstance_list" => bookinstance::list(&parse(template, context)?),
            "bookinstance/bookinstance_detail" => bookinstance::detail(&parse(template, context)?),
            "bookinstance/bookinstance_form" => bookinstance::form(&parse(template, context)?),
            "bookinstance/bookinstance_delete" => bookinstance::delete(&parse(template, context)?),
            "book/book_list" => book::list(&parse(template, context)?),
            "book/book_detail" => book::detail(&parse(template, context)?),
            other => return Err(RenderError::UnknownTemplate(other.to_string())),
        };

        Ok(markup.into_string())
    }
}

fn parse<T: DeserializeOwned>(template: &str, context: &Context) -> Result<T, RenderError> {
    serde_json::from_value(serde_json::Value::Object(context.clone())).map_err(|source| {
        RenderError::Context {
            template: template.to_string(),
            source,
        }
    })
}
