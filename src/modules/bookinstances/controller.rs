use std::sync::Arc;

use catalog_db::{BookInstanceDraft, BookInstanceWithBook, CatalogStore, EntityId};
use catalog_http::error::AppError;
use catalog_kernel::Renderer;
use serde_json::json;

use crate::modules::page::Page;
use crate::validation::{FieldRules, FormInput, Pipeline, Validated};

pub const LIST_URL: &str = "/catalog/bookinstances";

const LIST_TEMPLATE: &str = "bookinstance/bookinstance_list";
const DETAIL_TEMPLATE: &str = "bookinstance/bookinstance_detail";
const FORM_TEMPLATE: &str = "bookinstance/bookinstance_form";
const DELETE_TEMPLATE: &str = "bookinstance/bookinstance_delete";

fn rules() -> Pipeline {
    Pipeline::new(vec![
        FieldRules::new("book", "Book must be specified")
            .trim()
            .min_length(1)
            .escape(),
        FieldRules::new("imprint", "Imprint must be specified")
            .trim()
            .min_length(1)
            .escape(),
        FieldRules::field("status").escape(),
        FieldRules::new("due_back", "Invalid date")
            .optional()
            .iso8601_date(),
    ])
}

fn draft_from(id: Option<EntityId>, validated: &Validated) -> BookInstanceDraft {
    BookInstanceDraft {
        id,
        book: validated.text("book"),
        imprint: validated.text("imprint"),
        status: validated.text("status"),
        due_back: validated.date("due_back"),
    }
}

/// Orders copies by status, then by the title of the book they copy. Equal
/// keys keep their store order.
pub fn sort_for_listing(instances: &mut [BookInstanceWithBook]) {
    instances.sort_by(|a, b| {
        a.instance
            .status
            .as_str()
            .cmp(b.instance.status.as_str())
            .then_with(|| a.title().cmp(&b.title()))
    });
}

/// List, detail, create, delete and update for book instances.
pub struct BookInstanceController {
    store: Arc<dyn CatalogStore>,
    views: Arc<dyn Renderer>,
}

impl BookInstanceController {
    pub fn new(store: Arc<dyn CatalogStore>, views: Arc<dyn Renderer>) -> Self {
        Self { store, views }
    }

    fn render(&self, template: &str, values: serde_json::Value) -> Result<Page, AppError> {
        Page::render(self.views.as_ref(), template, values)
    }

    pub async fn list(&self) -> Result<Page, AppError> {
        let mut bookinstance_list = self.store.all_book_instances().await?;
        sort_for_listing(&mut bookinstance_list);

        self.render(
            LIST_TEMPLATE,
            json!({ "title": "Book Instance List", "bookinstance_list": bookinstance_list }),
        )
    }

    pub async fn detail(&self, id: &EntityId) -> Result<Page, AppError> {
        let bookinstance = self
            .store
            .book_instance_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book copy not found"))?;
        let title = format!("Copy: {}", bookinstance.title().unwrap_or_default());

        self.render(
            DETAIL_TEMPLATE,
            json!({ "title": title, "bookinstance": bookinstance }),
        )
    }

    pub async fn create_form(&self) -> Result<Page, AppError> {
        let book_list = self.store.all_books().await?;

        self.render(
            FORM_TEMPLATE,
            json!({ "title": "Create BookInstance", "book_list": book_list }),
        )
    }

    pub async fn create(&self, input: &FormInput) -> Result<Page, AppError> {
        let validated = rules().run(input);
        let draft = draft_from(None, &validated);

        if !validated.is_valid() {
            let book_list = self.store.all_books().await?;
            return self.render(
                FORM_TEMPLATE,
                json!({
                    "title": "Create BookInstance",
                    "book_list": book_list,
                    "bookinstance": draft,
                    "errors": validated.errors(),
                }),
            );
        }

        let instance = self.store.insert_book_instance(&draft).await?;
        tracing::info!(
            bookinstance_id = %instance.id,
            book_id = %instance.book,
            "book instance created"
        );
        Ok(Page::redirect(instance.url()))
    }

    pub async fn delete_form(&self, id: &EntityId) -> Result<Page, AppError> {
        let Some(bookinstance) = self.store.book_instance_by_id(id).await? else {
            return Ok(Page::redirect(LIST_URL));
        };

        self.render(
            DELETE_TEMPLATE,
            json!({ "title": "Delete Book Instance", "bookinstance": bookinstance }),
        )
    }

    pub async fn delete(&self, id: &EntityId) -> Result<Page, AppError> {
        if self.store.delete_book_instance(id).await? {
            tracing::info!(bookinstance_id = %id, "book instance deleted");
        } else {
            tracing::debug!(bookinstance_id = %id, "book instance already gone");
        }
        Ok(Page::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: &EntityId) -> Result<Page, AppError> {
        let (bookinstance, book_list) = tokio::try_join!(
            self.store.book_instance_by_id(id),
            self.store.all_books()
        )?;
        let bookinstance =
            bookinstance.ok_or_else(|| AppError::not_found("BookInstance not found"))?;

        self.render(
            FORM_TEMPLATE,
            json!({
                "title": "Update BookInstance",
                "book_list": book_list,
                "bookinstance": BookInstanceDraft::from(&bookinstance.instance),
            }),
        )
    }

    pub async fn update(&self, id: &EntityId, input: &FormInput) -> Result<Page, AppError> {
        let validated = rules().run(input);
        let draft = draft_from(Some(id.clone()), &validated);

        if !validated.is_valid() {
            let book_list = self.store.all_books().await?;
            return self.render(
                FORM_TEMPLATE,
                json!({
                    "title": "Update BookInstance",
                    "book_list": book_list,
                    "bookinstance": draft,
                    "errors": validated.errors(),
                }),
            );
        }

        let instance = self
            .store
            .update_book_instance(id, &draft)
            .await?
            .ok_or_else(|| AppError::not_found("BookInstance not found"))?;
        tracing::info!(bookinstance_id = %instance.id, "book instance updated");
        Ok(Page::redirect(instance.url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{seed_book, RecordingRenderer};
    use catalog_db::{
        Book, BookInstance, BookInstanceStatus, BookInstanceStore, MemoryStore, StoreError,
    };
    use chrono::NaiveDate;

    fn setup() -> (Arc<MemoryStore>, Arc<RecordingRenderer>, BookInstanceController) {
        let store = Arc::new(MemoryStore::in_memory());
        let views = RecordingRenderer::new();
        let controller = BookInstanceController::new(store.clone(), views.clone());
        (store, views, controller)
    }

    fn form(pairs: &[(&str, &str)]) -> FormInput {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    async fn seed_copy(store: &MemoryStore, book: &Book, status: &str) -> BookInstance {
        store
            .insert_book_instance(&BookInstanceDraft {
                id: None,
                book: book.id.to_string(),
                imprint: "First edition".to_string(),
                status: status.to_string(),
                due_back: None,
            })
            .await
            .unwrap()
    }

    fn joined(title: Option<&str>, status: BookInstanceStatus, imprint: &str) -> BookInstanceWithBook {
        let book = title.map(|title| Book {
            id: EntityId::from(title),
            title: title.to_string(),
            author: String::new(),
            summary: String::new(),
            isbn: String::new(),
            genres: Vec::new(),
        });
        BookInstanceWithBook {
            instance: BookInstance {
                id: EntityId::generate(),
                book: EntityId::from(title.unwrap_or("missing")),
                imprint: imprint.to_string(),
                status,
                due_back: None,
            },
            book,
        }
    }

    #[test]
    fn listing_sorts_by_status_then_title_and_is_stable() {
        let mut instances = vec![
            joined(Some("Zebra"), BookInstanceStatus::Loaned, "a"),
            joined(Some("Apple"), BookInstanceStatus::Maintenance, "b"),
            joined(Some("Apple"), BookInstanceStatus::Loaned, "c"),
            joined(Some("Apple"), BookInstanceStatus::Loaned, "d"),
            joined(Some("apple"), BookInstanceStatus::Available, "e"),
            joined(Some("Zebra"), BookInstanceStatus::Available, "f"),
        ];

        sort_for_listing(&mut instances);

        let order: Vec<&str> = instances
            .iter()
            .map(|entry| entry.instance.imprint.as_str())
            .collect();
        assert_eq!(order, vec!["f", "e", "c", "d", "a", "b"]);
    }

    #[test]
    fn listing_puts_dangling_references_first_within_a_status() {
        let mut instances = vec![
            joined(Some("Emma"), BookInstanceStatus::Available, "a"),
            joined(None, BookInstanceStatus::Available, "b"),
        ];

        sort_for_listing(&mut instances);

        assert_eq!(instances[0].instance.imprint, "b");
    }

    #[tokio::test]
    async fn list_renders_sorted_instances() {
        let (store, views, controller) = setup();
        let emma = seed_book(&store, "Emma", &[]).await;
        let dune = seed_book(&store, "Dune", &[]).await;
        seed_copy(&store, &emma, "Loaned").await;
        seed_copy(&store, &dune, "Loaned").await;
        seed_copy(&store, &emma, "Available").await;

        controller.list().await.unwrap();

        let ctx = views.last("bookinstance/bookinstance_list");
        assert_eq!(ctx["title"], "Book Instance List");
        let rows: Vec<(String, String)> = ctx["bookinstance_list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| {
                (
                    row["instance"]["status"].as_str().unwrap().to_string(),
                    row["book"]["title"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Available".to_string(), "Emma".to_string()),
                ("Loaned".to_string(), "Dune".to_string()),
                ("Loaned".to_string(), "Emma".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn detail_is_titled_after_the_book() {
        let (store, views, controller) = setup();
        let emma = seed_book(&store, "Emma", &[]).await;
        let copy = seed_copy(&store, &emma, "Available").await;

        controller.detail(&copy.id).await.unwrap();

        let ctx = views.last("bookinstance/bookinstance_detail");
        assert_eq!(ctx["title"], "Copy: Emma");
        assert_eq!(ctx["bookinstance"]["instance"]["id"], copy.id.as_str());
    }

    #[tokio::test]
    async fn detail_of_missing_copy_is_not_found() {
        let (_store, _views, controller) = setup();

        let err = controller
            .detail(&EntityId::from("missing"))
            .await
            .unwrap_err();

        match err {
            AppError::NotFound { message, .. } => assert_eq!(message, "Book copy not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_form_lists_books() {
        let (store, views, controller) = setup();
        seed_book(&store, "Emma", &[]).await;

        controller.create_form().await.unwrap();

        let ctx = views.last("bookinstance/bookinstance_form");
        assert_eq!(ctx["title"], "Create BookInstance");
        assert_eq!(ctx["book_list"][0]["title"], "Emma");
    }

    #[tokio::test]
    async fn create_persists_and_redirects_to_detail() {
        let (store, _views, controller) = setup();
        let emma = seed_book(&store, "Emma", &[]).await;

        let page = controller
            .create(&form(&[
                ("book", emma.id.as_str()),
                ("imprint", "  Penguin  "),
                ("status", "Loaned"),
                ("due_back", "2024-03-01"),
            ]))
            .await
            .unwrap();

        let all = store.all_book_instances().await.unwrap();
        assert_eq!(all.len(), 1);
        let created = &all[0].instance;
        assert_eq!(page, Page::redirect(created.url()));
        assert_eq!(created.imprint, "Penguin");
        assert_eq!(created.status, BookInstanceStatus::Loaned);
        assert_eq!(created.due_back, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[tokio::test]
    async fn create_with_missing_fields_redisplays_form_with_books() {
        let (store, views, controller) = setup();
        seed_book(&store, "Emma", &[]).await;

        let page = controller
            .create(&form(&[
                ("book", ""),
                ("imprint", "Penguin"),
                ("status", "Available"),
                ("due_back", "not a date"),
            ]))
            .await
            .unwrap();

        assert_eq!(page, Page::Rendered("bookinstance/bookinstance_form".to_string()));
        let ctx = views.last("bookinstance/bookinstance_form");
        assert_eq!(ctx["bookinstance"]["imprint"], "Penguin");
        assert_eq!(ctx["book_list"].as_array().unwrap().len(), 1);
        let messages: Vec<&str> = ctx["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|error| error["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages, vec!["Book must be specified", "Invalid date"]);
        assert!(store.all_book_instances().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_for_unknown_book_is_a_store_failure() {
        let (_store, _views, controller) = setup();

        let err = controller
            .create(&form(&[("book", "missing"), ("imprint", "Penguin")]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Store(StoreError::Rejected(_))));
    }

    #[tokio::test]
    async fn delete_form_for_missing_copy_redirects_to_list() {
        let (_store, views, controller) = setup();

        let page = controller
            .delete_form(&EntityId::from("missing"))
            .await
            .unwrap();

        assert_eq!(page, Page::redirect(LIST_URL));
        assert!(views.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (store, _views, controller) = setup();
        let emma = seed_book(&store, "Emma", &[]).await;
        let copy = seed_copy(&store, &emma, "Available").await;

        assert_eq!(controller.delete(&copy.id).await.unwrap(), Page::redirect(LIST_URL));
        assert_eq!(controller.delete(&copy.id).await.unwrap(), Page::redirect(LIST_URL));
        assert!(store.book_instance_by_id(&copy.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_form_is_prefilled() {
        let (store, views, controller) = setup();
        let emma = seed_book(&store, "Emma", &[]).await;
        let copy = seed_copy(&store, &emma, "Reserved").await;

        controller.update_form(&copy.id).await.unwrap();

        let ctx = views.last("bookinstance/bookinstance_form");
        assert_eq!(ctx["title"], "Update BookInstance");
        assert_eq!(ctx["bookinstance"]["status"], "Reserved");
        assert_eq!(ctx["bookinstance"]["book"], emma.id.as_str());
        assert_eq!(ctx["book_list"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_identity() {
        let (store, _views, controller) = setup();
        let emma = seed_book(&store, "Emma", &[]).await;
        let copy = seed_copy(&store, &emma, "Available").await;

        let page = controller
            .update(
                &copy.id,
                &form(&[
                    ("book", emma.id.as_str()),
                    ("imprint", "Second edition"),
                    ("status", "Maintenance"),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(page, Page::redirect(copy.url()));
        let stored = store.book_instance_by_id(&copy.id).await.unwrap().unwrap();
        assert_eq!(stored.instance.imprint, "Second edition");
        assert_eq!(stored.instance.status, BookInstanceStatus::Maintenance);
        assert_eq!(store.all_book_instances().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_update_refetches_books_and_keeps_id() {
        let (store, views, controller) = setup();
        let emma = seed_book(&store, "Emma", &[]).await;
        let copy = seed_copy(&store, &emma, "Available").await;

        controller
            .update(&copy.id, &form(&[("book", emma.id.as_str()), ("imprint", " ")]))
            .await
            .unwrap();

        let ctx = views.last("bookinstance/bookinstance_form");
        assert_eq!(ctx["bookinstance"]["id"], copy.id.as_str());
        assert_eq!(ctx["book_list"][0]["title"], "Emma");
        assert_eq!(ctx["errors"][0]["field"], "imprint");
    }

    #[tokio::test]
    async fn update_of_missing_copy_is_not_found() {
        let (store, _views, controller) = setup();
        let emma = seed_book(&store, "Emma", &[]).await;

        let err = controller
            .update(
                &EntityId::from("missing"),
                &form(&[("book", emma.id.as_str()), ("imprint", "Penguin")]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let (store, _views, controller) = setup();
        store.close().await.unwrap();

        assert!(matches!(
            controller.create_form().await.unwrap_err(),
            AppError::Store(StoreError::Closed)
        ));
        assert!(matches!(
            controller.delete(&EntityId::from("any")).await.unwrap_err(),
            AppError::Store(StoreError::Closed)
        ));
    }
}
