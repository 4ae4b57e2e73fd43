//! The single response a controller operation produces.

use axum::response::{Html, IntoResponse, Redirect, Response};
use catalog_http::error::AppError;
use catalog_kernel::{render::context, Renderer};

/// Outcome of a controller operation. Handlers return exactly one of these
/// (or an [`AppError`]), so a request is answered once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// A rendered view body.
    Rendered(String),
    /// A `303 See Other` to the given location.
    Redirect(String),
}

impl Page {
    pub fn redirect(location: impl Into<String>) -> Self {
        Page::Redirect(location.into())
    }

    /// Render `template` with the named values of a `json!({ ... })` object.
    pub fn render(
        views: &dyn Renderer,
        template: &str,
        values: serde_json::Value,
    ) -> Result<Self, AppError> {
        let body = views.render(template, &context(values))?;
        Ok(Page::Rendered(body))
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::Rendered(body) => Html(body).into_response(),
            Page::Redirect(location) => Redirect::to(&location).into_response(),
        }
    }
}
