use catalog_db::{Book, BookInstance, BookInstanceStatus, Genre};
use maud::{html, Markup};
use serde::Deserialize;

use crate::layout::page;

#[derive(Deserialize)]
pub(crate) struct ListContext {
    title: String,
    book_list: Vec<Book>,
}

#[derive(Deserialize)]
pub(crate) struct DetailContext {
    title: String,
    book: Book,
    book_genres: Vec<Genre>,
    book_instances: Vec<BookInstance>,
}

pub(crate) fn list(ctx: &ListContext) -> Markup {
    page(
        &ctx.title,
        html! {
            ul {
                @for book in &ctx.book_list {
                    li { a href=(book.url()) { (book.title) } " (" (book.author) ")" }
                }
            }
            @if ctx.book_list.is_empty() {
                p { "There are no books." }
            }
        },
    )
}

pub(crate) fn detail(ctx: &DetailContext) -> Markup {
    let book = &ctx.book;
    page(
        &ctx.title,
        html! {
            p { strong { "Author: " } (book.author) }
            p { strong { "Summary: " } (book.summary) }
            p { strong { "ISBN: " } (book.isbn) }
            p {
                strong { "Genre: " }
                @for (index, genre) in ctx.book_genres.iter().enumerate() {
                    @if index > 0 { ", " }
                    a href=(genre.url()) { (genre.name) }
                }
            }
            div {
                h4 { "Copies" }
                @for instance in &ctx.book_instances {
                    hr;
                    p { strong { "Imprint: " } (instance.imprint) }
                    p { strong { "Status: " } (instance.status.as_str()) }
                    @if instance.status != BookInstanceStatus::Available {
                        @if let Some(due_back) = &instance.due_back {
                            p { strong { "Due back: " } (due_back.format("%b %e, %Y").to_string()) }
                        }
                    }
                    p { strong { "Id: " } a href=(instance.url()) { (instance.id.as_str()) } }
                }
                @if ctx.book_instances.is_empty() {
                    p { "There are no copies of this book in the library." }
                }
            }
        },
    )
}
