use maud::{html, Markup, DOCTYPE};
use serde::Deserialize;

/// A field-level validation message as handed over by a controller.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FormError {
    pub field: String,
    pub message: String,
}

pub(crate) fn page(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Local Library" }
            }
            body {
                nav {
                    ul {
                        li { a href="/catalog/books" { "All books" } }
                        li { a href="/catalog/genres" { "All genres" } }
                        li { a href="/catalog/bookinstances" { "All book-instances" } }
                    }
                    hr;
                    ul {
                        li { a href="/catalog/genre/create" { "Create new genre" } }
                        li { a href="/catalog/bookinstance/create" { "Create new book instance (copy)" } }
                    }
                }
                main {
                    h1 { (title) }
                    (content)
                }
            }
        }
    }
}

pub(crate) fn errors(errors: &[FormError]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul.errors {
                @for error in errors {
                    li data-field=(error.field) { (error.message) }
                }
            }
        }
    }
}

/// Message for `field`, if the submission flagged it.
pub(crate) fn error_for<'a>(errors: &'a [FormError], field: &str) -> Option<&'a FormError> {
    errors.iter().find(|error| error.field == field)
}
