use catalog_db::{Book, BookInstanceDraft, BookInstanceStatus, BookInstanceWithBook};
use chrono::NaiveDate;
use maud::{html, Markup};
use serde::Deserialize;

use crate::layout::{error_for, errors, page, FormError};

#[derive(Deserialize)]
pub(crate) struct ListContext {
    title: String,
    bookinstance_list: Vec<BookInstanceWithBook>,
}

#[derive(Deserialize)]
pub(crate) struct DetailContext {
    title: String,
    bookinstance: BookInstanceWithBook,
}

#[derive(Deserialize)]
pub(crate) struct FormContext {
    title: String,
    book_list: Vec<Book>,
    #[serde(default)]
    bookinstance: Option<BookInstanceDraft>,
    #[serde(default)]
    errors: Vec<FormError>,
}

#[derive(Deserialize)]
pub(crate) struct DeleteContext {
    title: String,
    bookinstance: BookInstanceWithBook,
}

fn display_date(date: &NaiveDate) -> String {
    date.format("%b %e, %Y").to_string()
}

fn status_badge(status: BookInstanceStatus) -> Markup {
    html! {
        @match status {
            BookInstanceStatus::Available => {
                span.text-success { (status.as_str()) }
            }
            BookInstanceStatus::Maintenance => {
                span.text-danger { (status.as_str()) }
            }
            _ => {
                span.text-warning { (status.as_str()) }
            }
        }
    }
}

fn book_link(entry: &BookInstanceWithBook) -> Markup {
    html! {
        @match &entry.book {
            Some(book) => {
                a href=(book.url()) { (book.title) }
            }
            None => {
                em { "(missing book)" }
            }
        }
    }
}

fn summary(entry: &BookInstanceWithBook) -> Markup {
    let instance = &entry.instance;
    html! {
        p { strong { "Title: " } (book_link(entry)) }
        p { strong { "Imprint: " } (instance.imprint) }
        p { strong { "Status: " } (status_badge(instance.status)) }
        @if instance.status != BookInstanceStatus::Available {
            @if let Some(due_back) = &instance.due_back {
                p { strong { "Due back: " } (display_date(due_back)) }
            }
        }
    }
}

pub(crate) fn list(ctx: &ListContext) -> Markup {
    page(
        &ctx.title,
        html! {
            ul {
                @for entry in &ctx.bookinstance_list {
                    @let instance = &entry.instance;
                    li {
                        a href=(instance.url()) {
                            (entry.title().unwrap_or("(missing book)")) " : " (instance.imprint)
                        }
                        " - "
                        (status_badge(instance.status))
                        @if instance.status != BookInstanceStatus::Available {
                            @if let Some(due_back) = &instance.due_back {
                                span { " (Due: " (display_date(due_back)) ")" }
                            }
                        }
                    }
                }
            }
            @if ctx.bookinstance_list.is_empty() {
                p { "There are no book copies in this library." }
            }
        },
    )
}

pub(crate) fn detail(ctx: &DetailContext) -> Markup {
    let instance = &ctx.bookinstance.instance;
    page(
        &ctx.title,
        html! {
            h2 { "ID: " (instance.id.as_str()) }
            (summary(&ctx.bookinstance))
            hr;
            p { a href={ (instance.url()) "/delete" } { "Delete book instance" } }
            p { a href={ (instance.url()) "/update" } { "Update book instance" } }
        },
    )
}

pub(crate) fn form(ctx: &FormContext) -> Markup {
    let draft = ctx.bookinstance.clone().unwrap_or_default();
    let due_back = draft
        .due_back
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    page(
        &ctx.title,
        html! {
            form method="POST" action="" {
                div.form-group {
                    label for="book" { "Book:" }
                    select #book name="book" required {
                        option value="" { "--Please select a book--" }
                        @for book in &ctx.book_list {
                            option value=(book.id.as_str()) selected[draft.book == book.id.as_str()] { (book.title) }
                        }
                    }
                    @if let Some(error) = error_for(&ctx.errors, "book") {
                        span.field-error { (error.message) }
                    }
                }
                div.form-group {
                    label for="imprint" { "Imprint:" }
                    input #imprint type="text" name="imprint" placeholder="Publisher and date information" required value=(draft.imprint);
                    @if let Some(error) = error_for(&ctx.errors, "imprint") {
                        span.field-error { (error.message) }
                    }
                }
                div.form-group {
                    label for="due_back" { "Date when book available:" }
                    input #due_back type="date" name="due_back" value=(due_back);
                    @if let Some(error) = error_for(&ctx.errors, "due_back") {
                        span.field-error { (error.message) }
                    }
                }
                div.form-group {
                    label for="status" { "Status:" }
                    select #status name="status" required {
                        option value="" { "--Please select a status--" }
                        @for status in BookInstanceStatus::ALL {
                            option value=(status.as_str()) selected[draft.status == status.as_str()] { (status.as_str()) }
                        }
                    }
                    @if let Some(error) = error_for(&ctx.errors, "status") {
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
    let instance = &ctx.bookinstance.instance;
    page(
        &ctx.title,
        html! {
            h2 { "ID: " (instance.id.as_str()) }
            (summary(&ctx.bookinstance))
            p { "Do you really want to delete this Book Instance?" }
            form method="POST" action="" {
                input #bookinstanceid type="hidden" name="bookinstanceid" required value=(instance.id.as_str());
                button type="submit" { "Delete" }
            }
        },
    )
}
