use catalog_db::{Book, Genre, GenreDraft};
use maud::{html, Markup};
use serde::Deserialize;

use crate::layout::{error_for, errors, page, FormError};

#[derive(Deserialize)]
pub(crate) struct ListContext {
    title: String,
    genre_list: Vec<Genre>,
}

#[derive(Deserialize)]
pub(crate) struct DetailContext {
    title: String,
    genre: Genre,
    genre_books: Vec<Book>,
}

#[derive(Deserialize)]
pub(crate) struct FormContext {
    title: String,
    #[serde(default)]
    genre: Option<GenreDraft>,
    #[serde(default)]
    errors: Vec<FormError>,
}

#[derive(Deserialize)]
pub(crate) struct DeleteContext {
    title: String,
    genre: Genre,
    genre_books: Vec<Book>,
}

pub(crate) fn list(ctx: &ListContext) -> Markup {
    page(
        &ctx.title,
        html! {
            ul {
                @for genre in &ctx.genre_list {
                    li { a href=(genre.url()) { (genre.name) } }
                }
            }
            @if ctx.genre_list.is_empty() {
                p { "There are no genres." }
            }
        },
    )
}

fn book_summaries(books: &[Book]) -> Markup {
    html! {
        dl {
            @for book in books {
                dt { a href=(book.url()) { (book.title) } }
                dd { (book.summary) }
            }
        }
    }
}

pub(crate) fn detail(ctx: &DetailContext) -> Markup {
    page(
        &ctx.title,
        html! {
            h2 { "Genre: " (ctx.genre.name) }
            div {
                h4 { "Books" }
                @if ctx.genre_books.is_empty() {
                    p { "This genre has no books." }
                } @else {
                    (book_summaries(&ctx.genre_books))
                }
            }
            hr;
            p { a href={ (ctx.genre.url()) "/delete" } { "Delete genre" } }
            p { a href={ (ctx.genre.url()) "/update" } { "Update genre" } }
        },
    )
}

pub(crate) fn form(ctx: &FormContext) -> Markup {
    let name = ctx
        .genre
        .as_ref()
        .map(|genre| genre.name.as_str())
        .unwrap_or_default();

    page(
        &ctx.title,
        html! {
            form method="POST" action="" {
                div.form-group {
                    label for="name" { "Genre:" }
                    input #name type="text" name="name" placeholder="Fantasy, Poetry etc." required value=(name);
                    @if let Some(error) = error_for(&ctx.errors, "name") {
                        span.field-error { (error.message) }
                    }
                }
                button type="submit" { "Submit" }
            }
            (errors(&ctx.errors))
        },
    )
}

pub(crate) fn delete(ctx: &DeleteContext) -> Markup {
    page(
        &ctx.title,
        html! {
            h2 { "Genre: " (ctx.genre.name) }
            @if !ctx.genre_books.is_empty() {
                p { strong { "Delete the following books before attempting to delete this genre." } }
                div {
                    h4 { "Books" }
                    (book_summaries(&ctx.genre_books))
                }
            } @else {
                p { "Do you really want to delete this Genre?" }
                form method="POST" action="" {
                    input #genreid type="hidden" name="genreid" required value=(ctx.genre.id.as_str());
                    button type="submit" { "Delete" }
                }
            }
        },
    )
}
