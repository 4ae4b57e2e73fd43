//! Full-router scenarios: real views and store behind `build_router`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use catalog_db::{
    BookInstanceDraft, BookInstanceStore, CatalogData, GenreDraft, GenreStore, MemoryStore,
    NewBook,
};
use catalog_kernel::settings::Settings;
use catalog_views::HtmlRenderer;
use tower::ServiceExt;

use crate::bootstrap::build_registry;

fn app(store: Arc<MemoryStore>) -> Router {
    let registry = build_registry(store, Arc::new(HtmlRenderer::new()));
    catalog_http::build_router(&registry, &Settings::default())
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn root_redirects_to_genre_list() {
    let app = app(Arc::new(MemoryStore::in_memory()));

    let response = get(&app, "/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/genres");
}

#[tokio::test]
async fn health_check_answers_ok() {
    let app = app(Arc::new(MemoryStore::in_memory()));

    let response = get(&app, "/healthz").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn unknown_path_is_an_html_404() {
    let app = app(Arc::new(MemoryStore::in_memory()));

    let response = get(&app, "/catalog/authors").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));
}

#[tokio::test]
async fn genre_create_then_list() {
    let store = Arc::new(MemoryStore::in_memory());
    let app = app(store.clone());

    let response = post_form(&app, "/catalog/genre/create", "name=+Fiction+").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let genre = store.genre_by_name("Fiction").await.unwrap().unwrap();
    assert_eq!(location(&response), genre.url());

    let response = get(&app, "/catalog/genres").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<title>Genre List | Local Library</title>"));
    assert!(body.contains(&format!(r#"<a href="{}">Fiction</a>"#, genre.url())));
}

#[tokio::test]
async fn invalid_genre_form_is_redisplayed_with_200() {
    let app = app(Arc::new(MemoryStore::in_memory()));

    let response = post_form(&app, "/catalog/genre/create", "name=++").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Genre name required"));
    assert!(body.contains("Create Genre"));
}

#[tokio::test]
async fn missing_genre_detail_is_404() {
    let app = app(Arc::new(MemoryStore::in_memory()));

    let response = get(&app, "/catalog/genre/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Genre not found"));
}

#[tokio::test]
async fn genre_delete_round_trip() {
    let store = Arc::new(MemoryStore::in_memory());
    let app = app(store.clone());
    let genre = store
        .insert_genre(&GenreDraft {
            id: None,
            name: "Poetry".to_string(),
        })
        .await
        .unwrap();
    let delete_url = format!("{}/delete", genre.url());

    let response = get(&app, &delete_url).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Do you really want to delete this Genre?"));

    let response = post_form(&app, &delete_url, &format!("genreid={}", genre.id)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/genres");
    assert!(store.genre_by_id(&genre.id).await.unwrap().is_none());

    // Deleting again is a no-op redirect.
    let response = post_form(&app, &delete_url, "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn bookinstance_lifecycle_over_http() {
    let store = Arc::new(MemoryStore::in_memory());
    let app = app(store.clone());
    let book = store
        .insert_book(NewBook {
            title: "Emma".to_string(),
            author: "Jane Austen".to_string(),
            ..NewBook::default()
        })
        .await
        .unwrap();

    let response = get(&app, "/catalog/bookinstance/create").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Emma"));

    let form = format!(
        "book={}&imprint=Penguin+Classics&status=Loaned&due_back=2026-11-02",
        book.id
    );
    let response = post_form(&app, "/catalog/bookinstance/create", &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let detail_url = location(&response).to_string();

    let response = get(&app, &detail_url).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Copy: Emma"));
    assert!(body.contains("Penguin Classics"));

    let update = format!("book={}&imprint=Penguin+Classics&status=Available", book.id);
    let response = post_form(&app, &format!("{detail_url}/update"), &update).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), detail_url);

    let response = post_form(&app, &format!("{detail_url}/delete"), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstances");
    assert!(store.all_book_instances().await.unwrap().is_empty());
}

#[tokio::test]
async fn bookinstance_list_renders_joined_titles() {
    let store = Arc::new(MemoryStore::in_memory());
    let book = store
        .insert_book(NewBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            ..NewBook::default()
        })
        .await
        .unwrap();
    store
        .insert_book_instance(&BookInstanceDraft {
            book: book.id.to_string(),
            imprint: "Chilton".to_string(),
            status: "Reserved".to_string(),
            ..BookInstanceDraft::default()
        })
        .await
        .unwrap();
    let app = app(store);

    let response = get(&app, "/catalog/bookinstances").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Book Instance List"));
    assert!(body.contains("Dune"));
    assert!(body.contains("Reserved"));
}

#[tokio::test]
async fn closed_store_surfaces_as_500() {
    let store = Arc::new(MemoryStore::with_data(CatalogData::default()));
    store.close().await.unwrap();
    let app = app(store);

    let response = get(&app, "/catalog/genres").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
